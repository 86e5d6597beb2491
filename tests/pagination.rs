//! End-to-end pagination behavior

use std::time::{Duration, Instant};

use folio_reader::reader::{
    compute_geometry, estimate_column_count, pinned_width, FlowEstimator, FlowPass, HostRect,
    Key, PageNavigator, ReaderCommand, ReaderSession, TextFlowOracle, Viewport,
};

fn long_text(paragraphs: usize) -> Vec<String> {
    (0..paragraphs)
        .map(|i| {
            format!(
                "{}번째 문단입니다. 새침하게 흐린 품이 눈이 올 듯하더니 눈은 아니 오고 얼다가 만 비가 추적추적 내리는 날이었다.",
                i + 1
            )
        })
        .collect()
}

#[test]
fn test_two_column_geometry() {
    let geometry = compute_geometry(&Viewport::normalized(1000, 800));
    assert!(geometry.is_two_column());
    assert_eq!(geometry.column_width, 480);
    assert_eq!(geometry.stride(), 1040);
}

#[test]
fn test_single_column_geometry() {
    let viewport = Viewport::normalized(400, 800);
    assert!(!viewport.is_two_column);
    let geometry = compute_geometry(&viewport);
    assert_eq!(geometry.column_width, 400);
    assert_eq!(geometry.stride(), 440);
}

#[test]
fn test_estimate_and_pin() {
    let geometry = compute_geometry(&Viewport::normalized(1000, 800));
    assert_eq!(estimate_column_count(3160.0, 480, 40), 6);
    assert_eq!(pinned_width(6, 480, 40), Some(3080));

    let mut flow = FlowEstimator::new();
    let first = flow.estimate(3160.0, &geometry).unwrap();
    assert_eq!(first.pass, FlowPass::Estimate);
    assert_eq!(first.pinned_container_width, Some(3080));
    assert_eq!(first.total_pages, 3);

    // The same extent under the pinned width verifies with no drift
    let second = flow.estimate(3080.0, &geometry).unwrap();
    assert!(second.pass.is_verified());
    assert_eq!(second.estimated_column_count, 6);
    assert_eq!(second.total_pages, 3);
}

#[test]
fn test_navigator_clamps_on_shrink() {
    let mut nav = PageNavigator::new();
    nav.set_layout(5, 1040);
    nav.goto(4);
    nav.set_layout(2, 1040);
    assert_eq!(nav.current_page(), 1);
    assert!(!nav.next());
}

#[test]
fn test_session_paginates_long_text() {
    let start = Instant::now();
    let mut session = ReaderSession::default();
    session.mount(HostRect::new(1280.0, 800.0), start);
    session.replace_content("운수 좋은 날", long_text(80), start);

    let mut oracle = TextFlowOracle::default();
    let now = session.drain(start, &mut oracle);
    assert!(session.is_settled());

    let measurement = *session.measurement().unwrap();
    assert!(measurement.pass.is_verified());
    assert!(measurement.total_pages > 1);
    assert_eq!(
        measurement.total_pages,
        measurement
            .estimated_column_count
            .div_ceil(measurement.columns_per_page)
    );

    let geometry = session.geometry().unwrap();
    assert_eq!(
        session.navigator().stride(),
        geometry.columns_per_page * (geometry.column_width + geometry.gap)
    );

    // Walk to the end with the keyboard
    let total = session.navigator().total_pages();
    for _ in 0..total + 3 {
        session.handle_key(Key::ArrowRight);
    }
    assert_eq!(session.navigator().current_page(), total - 1);

    // Larger type means more pages; the current page stays in range
    session.set_font_size(32, now);
    session.drain(now, &mut oracle);
    assert!(session.navigator().total_pages() >= total);
    assert!(session.navigator().current_page() < session.navigator().total_pages());
}

#[test]
fn test_measurement_is_repeatable() {
    let start = Instant::now();
    let mut a = ReaderSession::default();
    let mut b = ReaderSession::default();
    for session in [&mut a, &mut b] {
        session.mount(HostRect::new(900.0, 700.0), start);
        session.replace_content("메밀꽃 필 무렵", long_text(40), start);
        session.drain(start, &mut TextFlowOracle::default());
    }
    assert_eq!(a.measurement(), b.measurement());
    assert_eq!(a.navigator().state(), b.navigator().state());
}

#[test]
fn test_resize_to_mobile_repaginates() {
    let start = Instant::now();
    let mut session = ReaderSession::default();
    let mut oracle = TextFlowOracle::default();
    session.mount(HostRect::new(1280.0, 800.0), start);
    session.replace_content("진달래꽃", long_text(30), start);
    let now = session.drain(start, &mut oracle);
    let desktop_pages = session.navigator().total_pages();
    session.handle(ReaderCommand::Goto(desktop_pages - 1));

    assert!(session.on_resize(HostRect::new(375.0, 667.0), now));
    // Nothing changes until the debounce expires
    session.poll(now + Duration::from_millis(149), &mut oracle);
    assert!(session.viewport().unwrap().is_two_column);

    session.drain(now, &mut oracle);
    let viewport = session.viewport().unwrap();
    assert!(!viewport.is_two_column);
    assert!(session.is_settled());
    assert!(session.navigator().current_page() < session.navigator().total_pages());
}
