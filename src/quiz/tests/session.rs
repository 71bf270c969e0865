use super::*;
use crate::config::ReportConfig;
use crate::quiz::plot::{AGGREGATE_LABEL, HazardChart};
use crate::quiz::session::{NOT_A_NUMBER, PROMPT, Question, Session};
use pretty_assertions::assert_eq;

fn session_with(report: ReportConfig) -> Session<Vec<HazardChart>> {
    let knock = BattingRow {
        fours: Some(2),
        sixes: Some(1),
        ..bat("andrew-thorpe", 40, "Bowled")
    };
    let batting = vec![
        knock,
        bat("amy", 0, "Caught"),
        bat("bo", 1, "Not out"),
        bat("amy", 12, "Bowled"),
    ];
    let bowling = vec![bowl("amy", 0, 1), bowl("bo", 1, 0), bowl("bo", 3, 2)];
    Session::new(frames(&batting, &bowling), report, Vec::new())
}

fn session() -> Session<Vec<HazardChart>> {
    session_with(ReportConfig::default())
}

fn run(session: &mut Session<Vec<HazardChart>>, input: &str) -> String {
    let mut input = input.as_bytes();
    let mut out = Vec::new();
    session.run(&mut input, &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn test_question_numbers() {
    assert_eq!(Question::from_number(1), Some(Question::FormatAverages));
    assert_eq!(Question::from_number(10), Some(Question::HazardCurve));
    assert_eq!(
        Question::from_number(6),
        Some(Question::Fixed("Josh Lee with 27"))
    );
    for n in [-1, 11, 42] {
        assert_eq!(Question::from_number(n), None);
    }
}

#[test]
fn test_loop_handles_bad_and_unknown_input() {
    let out = run(&mut session(), "abc\n6\n 7 \n42\n0\n6\n");
    let expected = format!(
        "{PROMPT}{NOT_A_NUMBER}\n{PROMPT}Josh Lee with 27\n{PROMPT}Chris Shone of course\n{PROMPT}{PROMPT}"
    );
    assert_eq!(out, expected);
}

#[test]
fn test_loop_ends_at_end_of_input() {
    let out = run(&mut session(), "6\n");
    assert_eq!(out, format!("{PROMPT}Josh Lee with 27\n{PROMPT}\n"));
}

#[test]
fn test_unclaimed_score_messages() {
    let out = run(&mut session(), "3\n0\n");
    assert!(out.contains("Lowest batting score not recorded is 2.\n"));
    assert!(out.contains("Lowest bowling score not recorded is 2.\n"));
}

#[test]
fn test_distance_run_message() {
    let out = run(&mut session(), "4\n0\n");
    assert!(out.contains("andrew-thorpe has had to run 0.46 km\n"), "{out}");

    let report = ReportConfig {
        featured_player: "nobody".to_owned(),
        ..ReportConfig::default()
    };
    let out = run(&mut session_with(report), "4\n0\n");
    assert!(out.contains("nobody has no innings recorded\n"));
}

#[test]
fn test_format_averages_sections() {
    let out = run(&mut session(), "1\n0\n");
    let batting = out.find("===BATTING===").unwrap();
    let bowling = out.find("===BOWLING===").unwrap();
    assert!(out.contains("The website is a bit cruel on some retirees"));
    assert!(batting < bowling);
    assert!(out[batting..bowling].contains("andrew-thorpe"));
}

#[test]
fn test_tour_split_sections_with_no_qualifiers() {
    let out = run(&mut session(), "9\n0\n");
    for heading in ["====BATTING====", "====BOWLING====", "====COMBINED===="] {
        assert!(out.contains(heading), "missing {heading}");
    }
    assert_eq!(out.matches("(no rows)").count(), 3);
}

#[test]
fn test_hazard_overlays_known_player() {
    let mut s = session();
    let out = run(&mut s, "10\namy\n0\n");
    assert!(out.contains("Which player? "));
    assert!(!out.contains("Couldn't find"));

    let charts = s.into_charts();
    assert_eq!(charts.len(), 1);
    assert_eq!(charts[0].labels(), vec![AGGREGATE_LABEL, "amy"]);
}

#[test]
fn test_hazard_unknown_player_lists_choices() {
    let mut s = session();
    let out = run(&mut s, "10\nzed\n0\n");
    assert!(out.contains(
        "Couldn't find zed. Choose one of the following:\nandrew-thorpe amy bo\n"
    ));
    assert_eq!(s.charts()[0].labels(), vec![AGGREGATE_LABEL]);
}

#[test]
fn test_failed_question_is_reported_and_loop_continues() {
    let report = ReportConfig {
        hazard_bandwidth: 0.0,
        ..ReportConfig::default()
    };
    let mut s = session_with(report);
    let out = run(&mut s, "10\namy\n7\n0\n");
    assert!(out.contains("Couldn't answer question 10"));
    assert!(out.contains("Chris Shone of course"));
    assert!(s.charts().is_empty());
}
