#![no_main]

use feature_spans::prelude::*;
use libfuzzer_sys::fuzz_target;

const VOCAB: &[&str] = &["a", "b", "ab", "ba", "w__a", "c__b", "w__", ""];

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }

    let n_weights = (data[0] as usize % 16) + 1; // 1-16 weights
    let n_found = data[1] as usize % 32; // 0-31 discovered features
    let mut bytes = data[2..].iter().copied();

    let mut entries = Vec::with_capacity(n_weights);
    for _ in 0..n_weights {
        let (Some(name), Some(w)) = (bytes.next(), bytes.next()) else {
            return;
        };
        let weight = (w as i8) as f64 / 16.0;
        let name = VOCAB[name as usize % VOCAB.len()];
        entries.push(FeatureWeight::new(name, weight));
    }
    let weights = FeatureWeights::from_weights(entries);

    let doc = "abab";
    let mut found = Vec::with_capacity(n_found);
    for _ in 0..n_found {
        let (Some(name), Some(start), Some(len)) = (bytes.next(), bytes.next(), bytes.next()) else {
            break;
        };
        let start = start as usize % doc.len();
        let end = (start + len as usize % 3).min(doc.len());
        found.push((vec![Span::new(start, end)], VOCAB[name as usize % VOCAB.len()].to_string()));
    }

    let single = Vectorizer::single(Precomputed::new(doc, found.clone()));
    let union = Vectorizer::union([
        FeatureSource::new("w", Precomputed::new(doc, found.clone())),
        FeatureSource::new("c", Precomputed::new(doc, found).with_kind(AnalyzerKind::Char)),
    ]);

    for vec in [&single, &union] {
        // every input is well-formed, so the validating path must agree
        let plain = explain_spans(doc, vec, &weights);
        let checked = try_explain_spans(doc, vec, &weights, &ExplainConfig::default());
        assert_eq!(checked, Ok(plain.clone()));

        let res = plain.expect("precomputed analyzers never decline");
        assert!(res.other.pos.iter().all(|fw| fw.weight >= 0.0));
        assert!(res.other.neg.iter().all(|fw| fw.weight < 0.0));
        let real = res
            .other
            .pos
            .iter()
            .chain(&res.other.neg)
            .filter(|fw| !fw.feature.is_formatted())
            .count();
        assert!(real <= weights.len());
    }
});
