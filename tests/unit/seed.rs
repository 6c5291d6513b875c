//! Seed models and the seed index.

use plast::config::{AlgoKind, SearchParams, SeedModelKind};
use plast::seed::{SeedModel, SequenceIndex};
use plast::sequence::Alphabet;

use super::helpers::protein_db;

fn assert_round_trip(model: &SeedModel) {
    for code in 0..model.code_count() {
        let word = model.decode(code);
        assert_eq!(word.len(), model.span());
        assert_eq!(model.encode(&word), Some(code), "code {code}");
    }
}

#[test]
fn test_round_trip_default_models() {
    for algo in [AlgoKind::Plastp, AlgoKind::Plastn] {
        let mut params = SearchParams::defaults(algo);
        if algo == AlgoKind::Plastn {
            // keep the exhaustive walk short
            params.seed_span = 6;
        }
        assert_round_trip(&SeedModel::from_params(&params).unwrap());
    }
}

#[test]
fn test_round_trip_basic_protein() {
    assert_round_trip(&SeedModel::basic(Alphabet::AminoAcid, 3).unwrap());
}

#[test]
fn test_custom_subseed_model() {
    let mut params = SearchParams::defaults(AlgoKind::Plastp);
    params.seed = SeedModelKind::Subseed(vec!["AST,G,P".into(), "ILMV,FWY".into()]);
    params.seed_span = 3;
    let model = SeedModel::from_params(&params).unwrap();
    assert_eq!(model.code_count(), 3 * 2 * 2);
    assert_round_trip(&model);

    let aa = Alphabet::AminoAcid;
    let a = model.encode(&aa.encode_all(b"SIW")).unwrap();
    let b = model.encode(&aa.encode_all(b"TLF")).unwrap();
    assert_eq!(a, b);
    // K belongs to no group of the first position
    assert_eq!(model.encode(&aa.encode_all(b"KIW")), None);
}

#[test]
fn test_index_occurrences_are_grouped_by_code() {
    let db = protein_db([
        ("a", "MKVLAAGTWQ".to_string()),
        ("b", "AAGTWQMKVL".to_string()),
    ]);
    let model = SeedModel::basic(Alphabet::AminoAcid, 4).unwrap();
    let index = SequenceIndex::build(&db, &model);
    assert_eq!(index.len(), 14);

    let code = model
        .encode(&Alphabet::AminoAcid.encode_all(b"AGTW"))
        .unwrap();
    let occ = index.occurrences(code);
    assert_eq!(occ.len(), 2);
    let places: Vec<(u32, u32)> = occ.iter().map(|o| (o.seq_index, o.offset_in_seq)).collect();
    assert_eq!(places, vec![(0, 5), (1, 1)]);
    assert_eq!(occ[1].offset_in_db, 11);
}
