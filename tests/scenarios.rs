use chrono::NaiveTime;
use itinerary_timeline::{parse_itinerary, Activity, Day, Timeline};

fn hm(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
}

fn activity(time: &str, start: NaiveTime, end: Option<NaiveTime>, description: &str) -> Activity {
    Activity {
        time: time.to_string(),
        start_time: start,
        end_time: end,
        description: description.to_string(),
        kind: Default::default(),
    }
}

const FULL_ITINERARY: &str = "\
Dưới đây là lịch trình 3 ngày tại Hà Nội:

**Ngày 1:**
- 08:00 - 09:00: Ăn sáng phở Bát Đàn
- 9:30-11:30: Văn Miếu – Quốc Tử Giám
### Chiều (14:00 - 16:00)
Thăm quan bảo tàng Dân tộc học
rồi dạo quanh hồ Tây

### Ngày 2
**Buổi sáng:** Đi chợ Đồng Xuân
- 12:00: Bún chả Hương Liên
Tối muộn
Phố bia Tạ Hiện

**Ngày 3:**
";

#[test]
fn empty_input_has_no_days() {
    assert_eq!(parse_itinerary(""), Timeline::default());
}

#[test]
fn whitespace_input_has_no_days() {
    assert!(parse_itinerary(" \n\r\n\t  \n").days.is_empty());
}

#[test]
fn lone_timed_line_gets_default_day() {
    let timeline = parse_itinerary("- 08:00 - 09:00: Ăn sáng");

    assert_eq!(
        timeline,
        Timeline {
            days: vec![Day {
                label: "Ngày 1".to_string(),
                activities: vec![activity(
                    "08:00 - 09:00",
                    hm(8, 0),
                    Some(hm(9, 0)),
                    "Ăn sáng"
                )],
            }],
        }
    );
}

#[test]
fn two_day_headers_make_two_days() {
    let timeline =
        parse_itinerary("**Ngày 1:**\n- 8:00-9:00: Khởi hành\n**Ngày 2:**\n- 9:00: Kết thúc");

    assert_eq!(timeline.days.len(), 2);
    assert_eq!(timeline.days[0].label, "Ngày 1");
    assert_eq!(
        timeline.days[0].activities,
        [activity("08:00 - 09:00", hm(8, 0), Some(hm(9, 0)), "Khởi hành")]
    );
    assert_eq!(timeline.days[1].label, "Ngày 2");
    assert_eq!(
        timeline.days[1].activities,
        [activity("09:00", hm(9, 0), None, "Kết thúc")]
    );
}

#[test]
fn period_header_collects_following_prose() {
    let timeline = parse_itinerary("# Chiều (14:00 - 16:00)\nThăm quan bảo tàng");

    assert_eq!(timeline.days.len(), 1);
    assert_eq!(timeline.days[0].label, "Ngày 1");
    assert_eq!(
        timeline.days[0].activities,
        [activity("Chiều", hm(14, 0), Some(hm(16, 0)), "Thăm quan bảo tàng")]
    );
}

#[test]
fn envelope_matches_plain_text() {
    assert_eq!(
        parse_itinerary(r#"{"content": "- 10:00-11:00: Test"}"#),
        parse_itinerary("- 10:00-11:00: Test")
    );
}

#[test]
fn envelope_is_transparent_for_a_whole_itinerary() {
    let wrapped = serde_json::json!({ "content": FULL_ITINERARY, "tokens": 512 }).to_string();
    assert_eq!(parse_itinerary(&wrapped), parse_itinerary(FULL_ITINERARY));
}

#[test]
fn full_itinerary_structure() {
    let timeline = parse_itinerary(FULL_ITINERARY);

    let labels: Vec<_> = timeline.days.iter().map(|day| day.label.as_str()).collect();
    assert_eq!(labels, ["Ngày 1", "Ngày 2", "Ngày 3"]);

    let first = &timeline.days[0].activities;
    assert_eq!(first.len(), 3);
    assert_eq!(first[1].time, "09:30 - 11:30");
    assert_eq!(first[1].description, "Văn Miếu – Quốc Tử Giám");
    assert_eq!(
        first[2].description,
        "Thăm quan bảo tàng Dân tộc học rồi dạo quanh hồ Tây"
    );

    let second = &timeline.days[1].activities;
    assert_eq!(
        second,
        &[
            activity("Buổi sáng", hm(8, 0), Some(hm(11, 0)), "Đi chợ Đồng Xuân"),
            activity("12:00", hm(12, 0), None, "Bún chả Hương Liên"),
            activity("Tối muộn", hm(21, 0), Some(hm(23, 0)), "Phố bia Tạ Hiện"),
        ]
    );

    assert!(timeline.days[2].activities.is_empty());
    assert_eq!(timeline.populated_days().count(), 2);
}

#[test]
fn activities_keep_source_order() {
    let timeline = parse_itinerary("- 15:00: Ba\n- 09:00: Một\n- 12:00: Hai");
    let descriptions: Vec<_> = timeline.days[0]
        .activities
        .iter()
        .map(|a| a.description.as_str())
        .collect();

    assert_eq!(descriptions, ["Ba", "Một", "Hai"]);
}

#[test]
fn parsing_is_deterministic() {
    let first = serde_json::to_string(&parse_itinerary(FULL_ITINERARY)).unwrap();
    let second = serde_json::to_string(&parse_itinerary(FULL_ITINERARY)).unwrap();
    assert_eq!(first, second);
}

#[test]
fn hostile_inputs_never_panic() {
    let inputs = [
        "{",
        r#"{"content": "- 10:00"#,
        r#"{"content": null}"#,
        "\u{0}\u{1}\u{fffd}\u{202e}",
        "**Ngày 99999999999999999999:**",
        "- 99:99 - 88:88: ???",
        "((((((((((",
        "Sáng (",
        "- : :",
        "\n\n\n",
        "Tối (14:00 - )\n- 8h: x",
    ];

    for input in inputs {
        let timeline = parse_itinerary(input);
        assert!(serde_json::to_string(&timeline).is_ok(), "input {input:?}");
    }
}

#[test]
fn timeline_json_round_trips_through_storage() {
    let timeline = parse_itinerary(FULL_ITINERARY);
    let stored = serde_json::to_string(&timeline).unwrap();
    let restored: Timeline = serde_json::from_str(&stored).unwrap();
    assert_eq!(restored, timeline);
}

#[test]
fn parsing_from_many_threads_agrees() {
    let expected = parse_itinerary(FULL_ITINERARY);
    let handles: Vec<_> = (0..8)
        .map(|_| std::thread::spawn(|| parse_itinerary(FULL_ITINERARY)))
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}
