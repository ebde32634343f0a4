//! FILENAME: tests/test_logging.rs
//! Integration tests for the unified log file sink.

use report_model::logging::{close_log_file, init_log_file, next_seq};
use report_model::{log_enter, log_info, log_warn};

#[test]
fn test_log_lines_use_unified_format() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("logs").join("binding.log");

    let opened = init_log_file(&path).unwrap();
    assert_eq!(opened, path);

    log_info!("SOURCE", "resolved widget={} origin={}", "c1", "default");
    log_warn!("FETCH", "discarded stale response seq={}", 3);
    log_enter!("DRILL", "descend", "level={}", 1);
    close_log_file();

    let content = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 3);

    assert!(lines[0].ends_with("|I|SOURCE|resolved widget=c1 origin=default"));
    assert!(lines[1].ends_with("|W|FETCH|discarded stale response seq=3"));
    assert!(lines[2].ends_with("|D|DRILL|ENTER descend level=1"));

    // sequence numbers are strictly increasing
    let seqs: Vec<u64> = lines
        .iter()
        .map(|l| l.split('|').next().unwrap().parse().unwrap())
        .collect();
    assert!(seqs.windows(2).all(|w| w[0] < w[1]));
    assert!(next_seq() > seqs[2]);
}
