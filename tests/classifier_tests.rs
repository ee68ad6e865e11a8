mod common;

use common::{table_text, zookeeper_records};
use pretty_assertions::assert_eq;
use proof_census::aggregator::{
    build_rule_set, classify_chunked, classify_records, parse_overlays, AnalysisTarget,
    CatchAllPolicy, Counter, Engine, RuleSet,
};
use proof_census::parser::{parse_table, Column, FileRecord};

const MAPPED_COLUMNS: [Column; 4] = [Column::Spec, Column::Proof, Column::Exec, Column::ProofAndExec];

fn rules_for(engine: Engine, target: &AnalysisTarget) -> RuleSet {
    build_rule_set(engine, target, &[], None).unwrap()
}

#[test]
fn test_zookeeper_loc_breakdown() {
    let target = AnalysisTarget::controller("zookeeper");
    let table = parse_table(&table_text(&zookeeper_records())).unwrap();
    let result = classify_records(&table.records, &target, &rules_for(Engine::Loc, &target)).unwrap();
    let agg = &result.aggregate;

    assert_eq!(agg.get("entry", Counter::Trusted), 33);
    assert_eq!(agg.get("external_model", Counter::Trusted), 105);
    assert_eq!(agg.get("wrapper", Counter::Trusted), 43);
    assert_eq!(agg.get("reconcile_impl", Counter::Exec), 11);
    assert_eq!(agg.get("reconcile_impl", Counter::Proof), 6);
    assert_eq!(agg.get("reconcile_model", Counter::Exec), 20);
    assert_eq!(agg.get("reconcile_model", Counter::Proof), 12);
    assert_eq!(agg.get("liveness_theorem", Counter::Trusted), 8);
    assert_eq!(agg.get("safety_theorem", Counter::Trusted), 5);
    assert_eq!(agg.get("liveness_inv", Counter::Proof), 3);
    assert_eq!(agg.get("liveness_proof", Counter::Proof), 222);
    assert_eq!(agg.get("safety_proof", Counter::Proof), 0);
    assert_eq!(agg.get("other", Counter::Exec), 9);
    assert_eq!(agg.get("other", Counter::Proof), 2);

    assert_eq!(result.stats.considered, 11);
    assert_eq!(result.stats.skipped, 2);
    assert_eq!(agg.len(), 11);
}

#[test]
fn test_rabbitmq_safety_subtree_not_swallowed_by_proof() {
    let target = AnalysisTarget::controller("rabbitmq");
    let records = vec![
        FileRecord::new("rabbitmq_controller/proof/safety/a.rs", 0, 1, 20, 0, 0),
        FileRecord::new("rabbitmq_controller/proof/liveness/b.rs", 0, 0, 7, 0, 0),
    ];
    let result = classify_records(&records, &target, &rules_for(Engine::Loc, &target)).unwrap();

    assert_eq!(result.aggregate.get("safety_proof", Counter::Proof), 21);
    assert_eq!(result.aggregate.get("liveness_proof", Counter::Proof), 7);
}

#[test]
fn test_helper_invariants_count_in_both_buckets() {
    let target = AnalysisTarget::controller("pkg");
    let records = vec![FileRecord::new("pkg_controller/proof/helper_invariants/bar.rs", 0, 1, 2, 0, 0)];
    let result = classify_records(&records, &target, &rules_for(Engine::Loc, &target)).unwrap();

    assert_eq!(result.aggregate.get("liveness_proof", Counter::Proof), 3);
    assert_eq!(result.aggregate.get("liveness_inv", Counter::Proof), 3);
}

#[test]
fn test_prefilter_excludes_other_controllers() {
    let target = AnalysisTarget::controller("zookeeper");
    let records = vec![
        FileRecord::new("rabbitmq_controller/exec/reconciler.rs", 0, 0, 0, 500, 0),
        FileRecord::new("shared/exec/util.rs", 0, 0, 0, 80, 0),
    ];
    let result = classify_records(&records, &target, &rules_for(Engine::Loc, &target)).unwrap();

    assert_eq!(result.aggregate.get("reconcile_impl", Counter::Exec), 0);
    assert_eq!(result.aggregate.grand_total(), 0);
    assert_eq!(result.stats.skipped, 2);
}

#[test]
fn test_every_filtered_record_lands_somewhere() {
    let target = AnalysisTarget::controller("zookeeper");
    let rules = rules_for(Engine::Loc, &target);

    for record in zookeeper_records().into_iter().filter(|r| target.admits(&r.path)) {
        let weight: u64 = MAPPED_COLUMNS.iter().map(|&c| record.count(c)).sum();
        let result = classify_records(std::slice::from_ref(&record), &target, &rules).unwrap();
        if weight > 0 {
            assert!(result.aggregate.grand_total() > 0, "{} vanished", record.path);
        }
        assert_eq!(result.stats.considered, 1);
    }
}

#[test]
fn test_conservation_after_reversing_double_counts() {
    let target = AnalysisTarget::controller("zookeeper");
    let rules = rules_for(Engine::Loc, &target);
    let records = zookeeper_records();
    let result = classify_records(&records, &target, &rules).unwrap();

    let mut reversed = result.aggregate.grand_total();
    let mut expected = 0;
    for record in records.iter().filter(|r| target.admits(&r.path)) {
        expected += MAPPED_COLUMNS.iter().map(|&c| record.count(c)).sum::<u64>();

        let destinations = match rules.first_match(&record.path) {
            Some(rule) => &rule.destinations,
            None => &rules.catch_all,
        };
        // Secondary destinations repeat the primary one
        for dest in destinations.iter().skip(1) {
            for column in MAPPED_COLUMNS {
                reversed -= dest.mapping.multiplicity(column) * record.count(column);
            }
        }
        // Proof+Exec feeding two counters of the same bucket
        let primary = &destinations[0].mapping;
        for column in MAPPED_COLUMNS {
            reversed -= primary.multiplicity(column).saturating_sub(1) * record.count(column);
        }
    }

    assert_eq!(reversed, expected);
}

#[test]
fn test_order_independence() {
    let target = AnalysisTarget::controller("zookeeper");
    let rules = rules_for(Engine::Loc, &target);
    let records = zookeeper_records();
    let baseline = classify_records(&records, &target, &rules).unwrap().aggregate;

    let mut reversed = records.clone();
    reversed.reverse();
    assert_eq!(classify_records(&reversed, &target, &rules).unwrap().aggregate, baseline);

    for shift in 1..records.len() {
        let mut rotated = records.clone();
        rotated.rotate_left(shift);
        assert_eq!(classify_records(&rotated, &target, &rules).unwrap().aggregate, baseline);
    }
}

#[test]
fn test_lines_engine_keeps_spec_apart() {
    let target = AnalysisTarget::controller("zookeeper");
    let records = vec![
        FileRecord::new("zookeeper_controller/spec/types.rs", 0, 4, 1, 2, 1),
        FileRecord::new("zookeeper_controller/spec/reconciler.rs", 0, 6, 1, 2, 0),
        FileRecord::new("zookeeper_controller/exec/zookeeper_api.rs", 0, 1, 1, 50, 2),
        FileRecord::new("zookeeper_controller/proof/helper_invariants/a.rs", 0, 1, 2, 0, 0),
        FileRecord::new("zookeeper_controller/weird.rs", 0, 1, 1, 1, 1),
    ];
    let result = classify_records(&records, &target, &rules_for(Engine::Lines, &target)).unwrap();
    let agg = &result.aggregate;

    assert_eq!(agg.get("spec_cr", Counter::Exec), 3);
    assert_eq!(agg.get("spec_cr", Counter::Proof), 2);
    assert_eq!(agg.get("spec_cr", Counter::Spec), 4);
    assert_eq!(agg.get("reconcile_spec", Counter::Spec), 6);
    assert_eq!(agg.get("external_model", Counter::Exec), 52);
    assert_eq!(agg.get("external_model", Counter::Spec), 1);
    // Exclusive in this engine, spec counted as proof
    assert_eq!(agg.get("liveness_inv", Counter::Proof), 3);
    assert_eq!(agg.get("liveness_proof", Counter::Proof), 0);
    // spec/reconciler.rs exec+proof plus the unclassified file
    assert_eq!(agg.get("reconcile_impl", Counter::Exec), 4);
    assert_eq!(agg.get("reconcile_impl", Counter::Proof), 3);
    assert_eq!(agg.get("reconcile_impl", Counter::Spec), 1);

    assert_eq!(result.stats.unclassified, vec!["zookeeper_controller/weird.rs".to_string()]);
    assert_eq!(agg.len(), 10);
}

#[test]
fn test_library_engine() {
    let target = AnalysisTarget::Library;
    let records = vec![
        FileRecord::new("unit_tests/a.rs", 0, 1, 1, 5, 1),
        FileRecord::new("temporal_logic/defs.rs", 0, 10, 0, 0, 0),
        FileRecord::new("temporal_logic/rules.rs", 0, 2, 30, 0, 0),
        FileRecord::new("kubernetes_cluster/proof/a.rs", 0, 1, 20, 0, 0),
        FileRecord::new("vstd_ext/seq_lib.rs", 0, 0, 5, 0, 0),
        FileRecord::new("kubernetes_api_objects/spec/pod.rs", 0, 40, 0, 0, 0),
        FileRecord::new("kubernetes_api_objects/exec/pod.rs", 0, 0, 0, 60, 2),
        FileRecord::new("shim_layer/x.rs", 0, 3, 1, 20, 2),
    ];
    let result = classify_records(&records, &target, &rules_for(Engine::Library, &target)).unwrap();
    let agg = &result.aggregate;

    assert_eq!(agg.get("test_lines", Counter::Exec), 6);
    assert_eq!(agg.get("test_lines", Counter::Proof), 3);
    assert_eq!(agg.get("tla_embedding_lines", Counter::Trusted), 10);
    assert_eq!(agg.get("tla_lemma_lines", Counter::Proof), 32);
    assert_eq!(agg.get("k8s_lemma_lines", Counter::Proof), 26);
    assert_eq!(agg.get("object_model_lines", Counter::Trusted), 40);
    assert_eq!(agg.get("object_wrapper_lines", Counter::Trusted), 62);
    assert_eq!(agg.get("other_lines", Counter::Exec), 22);
    assert_eq!(agg.get("other_lines", Counter::Trusted), 6);
    assert_eq!(result.stats.skipped, 0);
}

#[test]
fn test_strict_mode_fails_on_unclassified() {
    let target = AnalysisTarget::controller("zookeeper");
    let rules = build_rule_set(Engine::Loc, &target, &[], Some(CatchAllPolicy::Fail)).unwrap();
    let records = zookeeper_records();

    assert!(classify_records(&records, &target, &rules).is_err());

    let classified_only: Vec<FileRecord> = records
        .into_iter()
        .filter(|r| r.path != "zookeeper_controller/trusted/misc.rs")
        .collect();
    assert!(classify_records(&classified_only, &target, &rules).is_ok());
}

#[test]
fn test_chunked_matches_single_pass() {
    let target = AnalysisTarget::controller("zookeeper");
    let rules = rules_for(Engine::Loc, &target);
    let records = zookeeper_records();
    let whole = classify_records(&records, &target, &rules).unwrap();

    for chunk_size in [1, 2, 5, records.len()] {
        let chunked = classify_chunked(&records, &target, &rules, chunk_size).unwrap();
        assert_eq!(chunked.aggregate, whole.aggregate);
        assert_eq!(chunked.stats.considered, whole.stats.considered);
        assert_eq!(chunked.stats.skipped, whole.stats.skipped);
        assert_eq!(chunked.stats.per_rule, whole.stats.per_rule);
    }
}

#[test]
fn test_overlay_file_routes_new_category() {
    let overlays = parse_overlays(
        r#"
        [[overlay]]
        engine = "loc"
        target = "fluent"
        categories = ["conformance"]

        [[overlay.rule]]
        name = "conformance"
        when = { contains = "/proof/conformance/" }
        into = [{ category = "conformance", mapping = { Proof = ["proof", "spec"] } }]
        "#,
    )
    .unwrap();
    let target = AnalysisTarget::controller("fluent");
    let rules = build_rule_set(Engine::Loc, &target, &overlays, None).unwrap();
    let records = vec![
        FileRecord::new("fluent_controller/proof/conformance/a.rs", 0, 2, 9, 0, 0),
        FileRecord::new("fluent_controller/proof/liveness/b.rs", 0, 0, 4, 0, 0),
    ];
    let result = classify_records(&records, &target, &rules).unwrap();

    assert_eq!(result.aggregate.get("conformance", Counter::Proof), 11);
    assert_eq!(result.aggregate.get("liveness_proof", Counter::Proof), 4);
    assert_eq!(result.aggregate.len(), 12);
}

#[test]
fn test_exec_rule_applies_to_any_path() {
    let rules = rules_for(Engine::Loc, &AnalysisTarget::controller("pkg"));
    let text = [
        "| file | Trusted | Spec | Proof | Exec | Proof+Exec |",
        "|---|---|---|---|---|---|",
        "x|pkg/exec/foo.rs|0|2|3|10|1",
        "| ---------------- | | | | | |",
        "| total | 0 | 2 | 3 | 10 | 1 |",
    ]
    .join("\n");
    let table = parse_table(&text).unwrap();
    let record = &table.records[0];

    let rule = rules.first_match(&record.path).unwrap();
    assert_eq!(rule.name, "exec");

    let mut aggregate = rules.empty_aggregate();
    for dest in &rule.destinations {
        dest.mapping.apply(record, &dest.category, &mut aggregate);
    }
    assert_eq!(aggregate.get("reconcile_impl", Counter::Exec), 11);
    assert_eq!(aggregate.get("reconcile_impl", Counter::Proof), 6);
}
