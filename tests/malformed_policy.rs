//! One policy per run: malformed lines are either all skipped or the first one is fatal.

use sessionstat::{
    aggregate, AggregateError, AggregatorConfig, MalformedLinePolicy, MalformedRecord, ParseError,
};
use test_case::test_case;

const HEADER: &str = "user,0,Leida,Cira,0\nsession,0,0,Safari 29,87,2016-10-23\n";

fn with_bad_line(bad: &str) -> String {
    format!("{HEADER}{bad}\nsession,0,1,Firefox 12,118,2017-02-27\n")
}

#[test_case("session,0,2,Safari 29,eighty,2016-10-23" ; "non numeric duration")]
#[test_case("session,0,2,Safari 29,-4,2016-10-23" ; "negative duration")]
#[test_case("session,0,2,Safari,4,2016-10-23" ; "missing version")]
#[test_case("session,0,2,Safari 29,4,2016-02-30" ; "impossible date")]
#[test_case("session,0,2,Safari 29,4" ; "truncated")]
#[test_case("session,9,2,Safari 29,4,2016-10-23" ; "orphan session")]
#[test_case("user,0,Leida,Again,5" ; "duplicate user")]
#[test_case("garbage" ; "garbage")]
fn skip_policy_drops_only_the_bad_line(bad: &str) {
    let outcome = aggregate(with_bad_line(bad).as_bytes(), AggregatorConfig::default())
        .expect("skip policy never fails on content");

    assert_eq!(outcome.records_skipped, 1);
    assert_eq!(outcome.report.total_users, 1);
    assert_eq!(outcome.report.total_sessions, 2);
    assert_eq!(outcome.report.all_browsers, "FIREFOX 12,SAFARI 29");
    assert_eq!(outcome.report.users_stats["Leida Cira"].total_time, "205 min.");
}

#[test_case("session,0,2,Safari 29,eighty,2016-10-23" => matches MalformedRecord::Parse(ParseError::InvalidInteger { field: "duration", .. }) ; "non numeric duration")]
#[test_case("session,0,2,Safari 29,4,2016-02-30" => matches MalformedRecord::Parse(ParseError::InvalidDate(_)) ; "impossible date")]
#[test_case("session,9,2,Safari 29,4,2016-10-23" => MalformedRecord::UnknownUser("9".into()) ; "orphan session")]
#[test_case("user,0,Leida,Again,5" => MalformedRecord::DuplicateUser("0".into()) ; "duplicate user")]
fn fail_policy_reports_line_three(bad: &str) -> MalformedRecord {
    let config = AggregatorConfig::default().with_malformed_policy(MalformedLinePolicy::Fail);
    match aggregate(with_bad_line(bad).as_bytes(), config) {
        Err(AggregateError::Malformed { line, reason }) => {
            assert_eq!(line, 3);
            reason
        }
        other => panic!("expected a malformed record error, got {other:?}"),
    }
}

#[test]
fn fail_policy_accepts_clean_input() {
    let config = AggregatorConfig::default().with_malformed_policy(MalformedLinePolicy::Fail);
    let outcome = aggregate(HEADER.as_bytes(), config).expect("clean input aggregates");
    assert_eq!(outcome.records_skipped, 0);
    assert_eq!(outcome.report.total_sessions, 1);
}
