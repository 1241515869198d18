use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::error::Error;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::time::Duration;

use lib::grid::{build_grid, layout, models::Section, CampusPolicy, SlotTable};
use lib::week_view::models::payload_model::{FacultySchedule, StudentSchedule};
use lib::week_view::models::{Args, Config, OutputFormat, SectionPage, View};
use lib::week_view::publisher::GridPublisher;
use lib::week_view::render::{render_html, Palette};
use lib::week_view::run_tool::{run, watch};
use lib::week_view::schedule_getter::{collect_levels, ApiClient, SectionGetter};
use serde_json::json;
use tokio::sync::{mpsc, oneshot};

/// Serves every view from the JSON fixtures in tests/.
pub struct TestGetter;

fn read_fixture<T: serde::de::DeserializeOwned>(name: &str) -> Result<T, Box<dyn Error>> {
    let file = BufReader::new(File::open(PathBuf::from("tests").join(name))?);
    Ok(serde_json::from_reader(file)?)
}

impl SectionGetter for TestGetter {
    async fn get_sections(&self, view: &View) -> Result<SectionPage, Box<dyn Error>> {
        match view {
            View::Student { .. } => Ok(read_fixture::<StudentSchedule>("test.student_schedule.json")?.into()),
            View::Faculty { .. } => Ok(read_fixture::<FacultySchedule>("test.faculty_sections.json")?.into()),
            View::Level { .. } | View::All { .. } => Ok(SectionPage {
                sections: read_fixture("test.level_sections.json")?,
                owner: None,
            }),
        }
    }
}

type Script = Rc<RefCell<VecDeque<(Duration, Vec<Section>)>>>;

/// Answers each call with the next scripted page after the scripted delay.
pub struct ScriptedGetter {
    pub responses: Script,
}

impl ScriptedGetter {
    /// Also hands back the script, so a test can see how much was consumed.
    fn new(responses: Vec<(Duration, Vec<Section>)>) -> (Self, Script) {
        let script = Rc::new(RefCell::new(VecDeque::from(responses)));
        (
            ScriptedGetter {
                responses: Rc::clone(&script),
            },
            script,
        )
    }
}

impl SectionGetter for ScriptedGetter {
    async fn get_sections(&self, _view: &View) -> Result<SectionPage, Box<dyn Error>> {
        let next = self.responses.borrow_mut().pop_front();
        let (delay, sections) = next.ok_or("no more scripted responses")?;
        tokio::time::sleep(delay).await;
        Ok(SectionPage {
            sections,
            owner: None,
        })
    }
}

#[derive(Default)]
pub struct TestPublisher {
    pub published: Vec<String>,
}

impl GridPublisher for TestPublisher {
    fn publish(&mut self, rendered: &str) -> Result<(), Box<dyn Error>> {
        self.published.push(rendered.to_owned());
        Ok(())
    }
}

fn make_args(view: View, format: OutputFormat) -> Args {
    Args {
        config_json_path: PathBuf::from("example.config.json"),
        format,
        output: None,
        watch: false,
        search: None,
        faculty: None,
        view,
    }
}

fn level_view() -> View {
    View::Level {
        level_id: 3,
        group_id: None,
    }
}

fn section(id: u64, code: &str, day: &str, start: &str, end: &str) -> Section {
    serde_json::from_value(json!({
        "id": id,
        "course_code": code,
        "type": "lecture",
        "day": day,
        "start_time_hhmm": start,
        "end_time_hhmm": end,
    }))
    .unwrap()
}

async fn render_once(args: &Args) -> String {
    let mut publisher = TestPublisher::default();
    run(TestGetter, &mut publisher, args).await.unwrap();
    assert_eq!(publisher.published.len(), 1);
    publisher.published.remove(0)
}

#[test]
fn endpoints_follow_the_rest_api() {
    assert_eq!(
        ApiClient::endpoint(&View::Student { user_id: 7 }),
        "/sections/schedule/7"
    );
    assert_eq!(
        ApiClient::endpoint(&View::Faculty { faculty_id: 9 }),
        "/sections/faculty/9"
    );
    assert_eq!(ApiClient::endpoint(&level_view()), "/sections?level_id=3");
    assert_eq!(
        ApiClient::endpoint(&View::Level {
            level_id: 3,
            group_id: Some(2)
        }),
        "/sections?level_id=3&group_id=2"
    );
    assert_eq!(ApiClient::endpoint(&View::All { levels: vec![] }), "/sections");
}

#[tokio::test]
async fn level_view_html_spans_blocks_and_colors_by_status() {
    let html = render_once(&make_args(level_view(), OutputFormat::Html)).await;

    assert!(html.starts_with("<h2>Level 3</h2>"));
    /* 5 days x 8 slots, minus Sunday 09:00 and Monday 10:00 which are covered */
    assert_eq!(html.matches("<td rowspan=").count(), 38);
    assert_eq!(html.matches("Lunch Break").count(), 5);
    assert_eq!(html.matches("Exam Slot").count(), 2);

    /* the lab came last, so it owns Monday 09:00 */
    assert!(html.contains("<td rowspan=\"2\" data-day=\"Monday\" style=\"background:#fee2e2;color:#991b1b;height:144px\"><b>CS102</b>"));
    assert!(html.contains("Sec 2 &bull; lab"));
    assert!(!html.contains("A-102"));

    assert!(html.contains("<td rowspan=\"2\" data-day=\"Sunday\" style=\"background:#dcfce7;color:#166534;height:144px\"><b>CS101</b>"));

    /* the tutorial sits in Wednesday's exam window and is shown as blocked */
    assert!(!html.contains("MATH151"));
    /* unknown day never reaches the grid */
    assert!(!html.contains("HIST100"));
}

#[tokio::test]
async fn student_view_text_shows_owner_and_covered_slots() {
    let text = render_once(&make_args(View::Student { user_id: 11 }, OutputFormat::Text)).await;
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines[0], "My Weekly Schedule - Ada Lovelace");
    assert_eq!(lines.len(), 10);
    assert!(lines[1].starts_with("Time        | Sunday"));

    let nine = lines.iter().find(|l| l.starts_with("09:00-10:00")).unwrap();
    assert!(nine.contains("CS101 lecture x2"));
    let ten = lines.iter().find(|l| l.starts_with("10:00-11:00")).unwrap();
    assert!(ten.contains("| |"));

    /* a half-hour lab still takes two rows */
    let two = lines.iter().find(|l| l.starts_with("14:00-15:00")).unwrap();
    assert!(two.contains("MATH151 lab x2"));
    let three = lines.iter().find(|l| l.starts_with("15:00-16:00")).unwrap();
    assert!(three.contains("| |"));

    /* no blocked windows outside the schedule builder */
    assert!(!text.contains("Lunch Break"));
}

#[tokio::test]
async fn faculty_view_accepts_bare_array() {
    let details = render_once(&make_args(View::Faculty { faculty_id: 4 }, OutputFormat::Details)).await;
    let lines: Vec<&str> = details.lines().collect();
    assert_eq!(lines[0], "My Teaching Schedule");
    assert!(lines[1].starts_with("Course"));
    assert_eq!(lines.len(), 3);
    assert!(lines[2].starts_with("CS210"));
    assert!(lines[2].contains("15:00-16:00"));
    assert!(lines[2].contains("tutorial"));
}

#[tokio::test]
async fn committee_stats_with_search_and_faculty() {
    let mut args = make_args(View::All { levels: vec![] }, OutputFormat::Stats);
    args.faculty = Some("Dr. Hopper".to_owned());
    let report: serde_json::Value = serde_json::from_str(&render_once(&args).await).unwrap();

    assert_eq!(report["overall"]["total_sections"], 5);
    assert_eq!(report["overall"]["total_faculties"], 3);
    assert_eq!(report["overall"]["unassigned_sections"], 1);
    assert_eq!(report["faculty"]["name"], "Dr. Hopper");
    assert_eq!(report["faculty"]["total_sections"], 2);
    assert_eq!(report["faculty"]["weekly_hours"], 3.0);
}

#[tokio::test]
async fn search_narrows_the_grid() {
    let mut args = make_args(View::All { levels: vec![] }, OutputFormat::Text);
    args.search = Some("calculus".to_owned());
    let text = render_once(&args).await;
    assert!(text.contains("MATH151"));
    assert!(!text.contains("CS101"));
    assert!(!text.contains("CS102"));
}

fn watch_config() -> Config {
    Config {
        api_base_url: "http://localhost".to_owned(),
        api_token: None,
        poll_interval_secs: 3600,
    }
}

#[tokio::test(start_paused = true)]
async fn watch_republishes_after_reload() {
    let (getter, _) = ScriptedGetter::new(vec![
        (Duration::ZERO, vec![section(1, "CS101", "Monday", "09:00", "10:00")]),
        (Duration::ZERO, vec![section(1, "CS101", "Monday", "09:00", "10:00")]),
        (
            Duration::ZERO,
            vec![
                section(1, "CS101", "Monday", "09:00", "10:00"),
                section(2, "CS777", "Tuesday", "11:00", "12:00"),
            ],
        ),
    ]);
    let args = make_args(View::All { levels: vec![] }, OutputFormat::Text);
    let config = watch_config();
    let (reload_tx, reload_rx) = mpsc::channel(4);
    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let mut publisher = TestPublisher::default();

    let driver = async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        reload_tx.send(()).await.unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;
        reload_tx.send(()).await.unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;
        stop_tx.send(()).unwrap();
    };
    let shutdown = async {
        let _ = stop_rx.await;
    };

    let (result, ()) = tokio::join!(
        watch(getter, &mut publisher, &args, &config, reload_rx, shutdown),
        driver
    );
    result.unwrap();

    /* the identical second snapshot is not republished */
    assert_eq!(publisher.published.len(), 2);
    assert!(!publisher.published[0].contains("CS777"));
    assert!(publisher.published[1].contains("CS777"));
}

#[tokio::test(start_paused = true)]
async fn watch_discards_responses_overtaken_by_a_newer_fetch() {
    let (getter, _) = ScriptedGetter::new(vec![
        (
            Duration::from_millis(200),
            vec![section(1, "OLD100", "Monday", "09:00", "10:00")],
        ),
        (
            Duration::from_millis(10),
            vec![section(2, "NEW200", "Monday", "09:00", "10:00")],
        ),
    ]);
    let args = make_args(View::All { levels: vec![] }, OutputFormat::Text);
    let config = watch_config();
    let (reload_tx, reload_rx) = mpsc::channel(4);
    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let mut publisher = TestPublisher::default();

    let driver = async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        reload_tx.send(()).await.unwrap();
        tokio::time::sleep(Duration::from_millis(300)).await;
        stop_tx.send(()).unwrap();
    };
    let shutdown = async {
        let _ = stop_rx.await;
    };

    let (result, ()) = tokio::join!(
        watch(getter, &mut publisher, &args, &config, reload_rx, shutdown),
        driver
    );
    result.unwrap();

    assert_eq!(publisher.published.len(), 1);
    assert!(publisher.published[0].contains("NEW200"));
    assert!(!publisher.published[0].contains("OLD100"));
}

#[tokio::test(start_paused = true)]
async fn watch_publishes_when_backend_is_slower_than_the_poll() {
    let responses = (0..30)
        .map(|i| {
            (
                Duration::from_millis(1500),
                vec![section(i, &format!("CS{}", 100 + i), "Monday", "09:00", "10:00")],
            )
        })
        .collect();
    let (getter, script) = ScriptedGetter::new(responses);
    let args = make_args(View::All { levels: vec![] }, OutputFormat::Text);
    let config = Config {
        poll_interval_secs: 1,
        ..watch_config()
    };
    let (_reload_tx, reload_rx) = mpsc::channel(4);
    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let mut publisher = TestPublisher::default();

    let driver = async move {
        tokio::time::sleep(Duration::from_secs(20)).await;
        stop_tx.send(()).unwrap();
    };
    let shutdown = async {
        let _ = stop_rx.await;
    };

    let (result, ()) = tokio::join!(
        watch(getter, &mut publisher, &args, &config, reload_rx, shutdown),
        driver
    );
    result.unwrap();

    /* one fetch every other tick, each one lands */
    assert!(publisher.published.len() >= 5, "published {}", publisher.published.len());
    assert!(publisher.published[0].contains("CS100"));
    assert!(publisher.published[1].contains("CS101"));
    /* polls are skipped, not stacked, while a fetch is running */
    assert!(script.borrow().len() >= 15);
}

#[tokio::test(start_paused = true)]
async fn levels_are_fetched_together_and_kept_in_order() {
    let started = tokio::time::Instant::now();
    let sections = collect_levels(&[3, 1, 2], |level_id| async move {
        /* the first level asked for answers last */
        tokio::time::sleep(Duration::from_millis(100 * level_id)).await;
        Ok::<_, String>(vec![
            section(level_id * 10, &format!("L{}A", level_id), "Sunday", "08:00", "09:00"),
            section(level_id * 10 + 1, &format!("L{}B", level_id), "Sunday", "09:00", "10:00"),
        ])
    })
    .await
    .unwrap();

    let codes: Vec<&str> = sections.iter().map(|s| s.code()).collect();
    assert_eq!(codes, ["L3A", "L3B", "L1A", "L1B", "L2A", "L2B"]);
    assert!(started.elapsed() < Duration::from_millis(600));
}

#[tokio::test]
async fn one_failing_level_fails_the_page() {
    let result = collect_levels(&[1, 2, 3], |level_id| async move {
        if level_id == 2 {
            Err(format!("level {} unavailable", level_id))
        } else {
            Ok(vec![section(level_id, "CS101", "Sunday", "08:00", "09:00")])
        }
    })
    .await;
    assert_eq!(result.unwrap_err(), "level 2 unavailable");
}

#[test]
fn html_span_stops_at_the_last_row() {
    let mut lab = section(1, "CS310", "Monday", "15:00", "16:00");
    lab.kind = Some(lib::grid::SectionType::Lab);
    let sections = vec![lab];
    let table = SlotTable::standard();
    let grid = build_grid(&sections);
    let rows = layout(&grid, &table, &CampusPolicy);
    assert_eq!(rows.last().unwrap().cells[1].span, 2);

    let html = render_html(&rows, &table, "Level 1", Palette::Status);
    assert!(!html.contains("rowspan=\"2\""));
    assert!(html.contains("<td rowspan=\"1\" data-day=\"Monday\" style=\"background:transparent;color:#000;height:72px\"><b>CS310</b>"));
}
