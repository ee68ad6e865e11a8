#![allow(dead_code)]

use proof_census::parser::FileRecord;

pub const HEADER: &str =
    "| file | Trusted | Spec | Proof | Exec | Proof+Exec | Comment | Layout | unaccounted | Directives |";
pub const RULE: &str =
    "|------|---------|------|-------|------|------------|---------|--------|-------------|------------|";
pub const SEPARATOR: &str = "| ------------------------ | | | | | | | | | |";

/// Render records as a complete line-count table, totals row included
pub fn table_text(records: &[FileRecord]) -> String {
    let mut rows = vec![HEADER.to_string(), RULE.to_string()];
    let mut total = [0u64; 5];
    for r in records {
        rows.push(format!(
            "| {} | {} | {} | {} | {} | {} | 0 | 0 | 0 | 0 |",
            r.path, r.trusted, r.spec, r.proof, r.exec, r.proof_and_exec
        ));
        for (sum, v) in total
            .iter_mut()
            .zip([r.trusted, r.spec, r.proof, r.exec, r.proof_and_exec])
        {
            *sum += v;
        }
    }
    rows.push(SEPARATOR.to_string());
    rows.push(format!(
        "| total | {} | {} | {} | {} | {} | 0 | 0 | 0 | 0 |",
        total[0], total[1], total[2], total[3], total[4]
    ));
    rows.join("\n") + "\n"
}

/// A zookeeper-flavoured table touching every loc rule, plus foreign rows
pub fn zookeeper_records() -> Vec<FileRecord> {
    vec![
        FileRecord::new("zookeeper_controller.rs", 0, 1, 2, 30, 0),
        FileRecord::new("zookeeper_controller/trusted/zookeeper_api_exec.rs", 0, 0, 0, 100, 5),
        FileRecord::new("zookeeper_controller/trusted/exec_types.rs", 0, 3, 0, 40, 0),
        FileRecord::new("zookeeper_controller/exec/reconciler.rs", 0, 2, 3, 10, 1),
        FileRecord::new("zookeeper_controller/model/reconciler.rs", 0, 5, 7, 20, 0),
        FileRecord::new("zookeeper_controller/trusted/liveness_theorem.rs", 0, 8, 0, 0, 0),
        FileRecord::new("zookeeper_controller/trusted/safety_theorem.rs", 0, 4, 1, 0, 0),
        FileRecord::new("zookeeper_controller/proof/helper_invariants/bar.rs", 0, 1, 2, 0, 0),
        FileRecord::new("zookeeper_controller/proof/liveness/spec.rs", 0, 10, 200, 0, 0),
        FileRecord::new("zookeeper_controller/proof/safety/x.rs", 0, 0, 9, 0, 0),
        FileRecord::new("zookeeper_controller/trusted/misc.rs", 0, 0, 0, 7, 2),
        FileRecord::new("rabbitmq_controller/exec/reconciler.rs", 0, 0, 0, 999, 0),
        FileRecord::new("kubernetes_api_objects/spec/pod.rs", 0, 40, 0, 0, 0),
    ]
}
