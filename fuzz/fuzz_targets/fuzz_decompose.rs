#![no_main]

use libfuzzer_sys::fuzz_target;
use ransom::{decompose, CorpusIndex, SourceRecord};

fuzz_target!(|input: (Vec<String>, String)| {
    // Fragments must concatenate back to the target whenever decomposition succeeds
    let (texts, target) = input;
    let records: Vec<SourceRecord> = texts
        .iter()
        .map(|t| SourceRecord::new().with_field("text", t.as_str()))
        .collect();

    let Ok(index) = CorpusIndex::build(&records, &["text"]) else {
        return;
    };
    if let Ok(fragments) = decompose(&target, &index, 3) {
        let joined: String = fragments.iter().map(|f| f.text.as_str()).collect();
        assert_eq!(joined, target);
    }
});
