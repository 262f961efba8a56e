use crate::*;

use alloc::sync::Arc;
use alloc::vec::Vec;
use proptest::prelude::*;
use std::boxed::Box;
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug, Default)]
struct ViewportState {
    offset: f64,
    height: Option<f64>,
    commands: Vec<(f64, ScrollBehavior)>,
}

#[derive(Clone, Debug, Default)]
struct MockViewport(Rc<RefCell<ViewportState>>);

impl MockViewport {
    fn new(height: Option<f64>) -> Self {
        let v = Self::default();
        v.0.borrow_mut().height = height;
        v
    }

    fn set_offset(&self, offset: f64) {
        self.0.borrow_mut().offset = offset;
    }

    fn last_command(&self) -> Option<(f64, ScrollBehavior)> {
        self.0.borrow().commands.last().copied()
    }
}

impl ScrollSource for MockViewport {
    fn scroll_offset(&self) -> f64 {
        self.0.borrow().offset
    }

    fn viewport_height(&self) -> Option<f64> {
        self.0.borrow().height
    }

    fn scroll_to(&mut self, offset: f64, behavior: ScrollBehavior) {
        let mut s = self.0.borrow_mut();
        s.offset = offset;
        s.commands.push((offset, behavior));
    }
}

struct ContentState {
    connected: bool,
    rendered: VisibleRange,
    height: Box<dyn Fn(usize) -> f64>,
    measure_calls: usize,
    disconnect_after: Option<usize>,
}

#[derive(Clone)]
struct MockContent(Rc<RefCell<ContentState>>);

impl MockContent {
    fn new(height: impl Fn(usize) -> f64 + 'static) -> Self {
        Self(Rc::new(RefCell::new(ContentState {
            connected: true,
            rendered: VisibleRange::EMPTY,
            height: Box::new(height),
            measure_calls: 0,
            disconnect_after: None,
        })))
    }

    fn uniform(height: f64) -> Self {
        Self::new(move |_| height)
    }

    fn render(&self, range: VisibleRange) {
        self.0.borrow_mut().rendered = range;
    }

    fn disconnect_after(&self, calls: usize) {
        self.0.borrow_mut().disconnect_after = Some(calls);
    }
}

impl MeasurementSurface for MockContent {
    fn is_connected(&self) -> bool {
        self.0.borrow().connected
    }

    fn measure(&self, index: usize) -> Option<f64> {
        let mut s = self.0.borrow_mut();
        s.measure_calls += 1;
        let calls = s.measure_calls;
        if s.disconnect_after.is_some_and(|n| calls >= n) {
            s.connected = false;
        }
        if s.rendered.contains(index) {
            Some((s.height)(index))
        } else {
            None
        }
    }
}

fn items(n: usize) -> Arc<[u32]> {
    (0..n as u32).map(|i| i * 10).collect()
}

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-6 * a.abs().max(b.abs()).max(1.0)
}

/// Mounts a controller the way a host would: bootstrap, render, attach both surfaces.
fn mount(
    len: usize,
    options: ControllerOptions,
    viewport: &MockViewport,
    content: &MockContent,
) -> WindowController<u32> {
    let mut c = WindowController::new(items(len), options);
    content.render(c.visible_range());
    c.attach_viewport(viewport.clone());
    c.attach_content(content.clone());
    c
}

/// Delivers frames 16 ms apart until the controller goes quiet, re-rendering after each
/// completed cycle. Returns the number of completed cycles and the next frame time.
fn drive(c: &mut WindowController<u32>, content: &MockContent, mut now_ms: u64) -> (usize, u64) {
    let mut completed = 0;
    for _ in 0..64 {
        if !c.wants_frame() {
            break;
        }
        if let CycleOutcome::Completed { .. } = c.on_frame(now_ms) {
            completed += 1;
            content.render(c.visible_range());
            c.on_commit();
        }
        now_ms += 16;
    }
    assert!(!c.wants_frame(), "controller did not settle");
    (completed, now_ms)
}

fn assert_window_consistent(c: &WindowController<u32>) {
    let r = c.visible_range();
    let n = c.item_count();
    assert!(r.start <= r.end && r.end <= n, "range {r:?} for {n} items");
    assert_eq!(r.is_empty(), n == 0);
    let m = c.height_model();
    let p = c.padding();
    assert!(approx_eq(
        p.top + m.height_between(r.start, r.end) + p.bottom,
        c.total_height()
    ));
}

fn counter() -> (Arc<AtomicUsize>, Arc<AtomicUsize>) {
    let n = Arc::new(AtomicUsize::new(0));
    (n.clone(), n)
}

#[test]
fn bootstrap_renders_the_floor_before_the_viewport_is_known() {
    let c = WindowController::new(items(1000), ControllerOptions::default());
    assert_eq!(c.phase(), Phase::Idle);
    assert!(!c.wants_frame());
    assert_eq!(c.visible_range(), VisibleRange { start: 0, end: 24 });
    assert_eq!(c.padding(), Padding { top: 0.0, bottom: 976.0 * 50.0 });
    assert_eq!(c.total_height(), 50_000.0);
}

#[test]
fn attaching_the_viewport_runs_a_second_pass_with_the_real_size() {
    let viewport = MockViewport::new(Some(400.0));
    let content = MockContent::uniform(50.0);
    let options = ControllerOptions::default().with_min_viewport_floor(0.0);
    let mut c = mount(1000, options, &viewport, &content);
    assert_eq!(c.visible_range(), VisibleRange { start: 0, end: 9 });
    assert!(c.wants_frame());

    let (completed, _) = drive(&mut c, &content, 0);
    assert!(completed >= 1);
    assert_eq!(c.visible_range(), VisibleRange { start: 0, end: 16 });
    assert_window_consistent(&c);
}

#[test]
fn measurement_waits_for_two_frames() {
    let viewport = MockViewport::new(Some(800.0));
    let content = MockContent::uniform(50.0);
    let mut c = mount(100, ControllerOptions::default(), &viewport, &content);

    assert_eq!(c.phase(), Phase::Scheduled { frames_remaining: 2 });
    assert_eq!(c.on_frame(0), CycleOutcome::Waiting);
    assert_eq!(c.phase(), Phase::Scheduled { frames_remaining: 1 });
    assert_eq!(c.height_model().measured_count(), 0);

    assert!(matches!(c.on_frame(16), CycleOutcome::Completed { .. }));
    assert_eq!(c.phase(), Phase::Idle);
    assert_eq!(c.height_model().measured_count(), 24);
}

#[test]
fn frames_before_measure_is_configurable() {
    let viewport = MockViewport::new(Some(800.0));
    let content = MockContent::uniform(50.0);
    let options = ControllerOptions::default().with_frames_before_measure(1);
    let mut c = mount(100, options, &viewport, &content);
    assert!(matches!(c.on_frame(0), CycleOutcome::Completed { .. }));
}

#[test]
fn measured_heights_update_range_and_padding() {
    let viewport = MockViewport::new(Some(800.0));
    let content = MockContent::uniform(100.0);
    let mut c = mount(100, ControllerOptions::default(), &viewport, &content);

    // First cycle measures the bootstrap window [0, 24); the second measures [0, 16) and settles.
    let (completed, _) = drive(&mut c, &content, 0);
    assert_eq!(completed, 2);
    assert_eq!(c.visible_range(), VisibleRange { start: 0, end: 16 });
    assert_eq!(c.padding(), Padding { top: 0.0, bottom: 8_400.0 });
    assert_eq!(c.total_height(), 10_000.0);
    assert_eq!(c.height_model().average_height(), 100.0);
}

#[test]
fn stable_window_stops_rescheduling() {
    let viewport = MockViewport::new(Some(800.0));
    let content = MockContent::uniform(50.0);
    let mut c = mount(1000, ControllerOptions::default(), &viewport, &content);
    let (completed, _) = drive(&mut c, &content, 0);
    assert_eq!(completed, 1);

    c.on_commit();
    assert!(!c.wants_frame());
}

#[test]
fn mixed_heights_converge() {
    let viewport = MockViewport::new(Some(600.0));
    let content = MockContent::new(|i| if i % 3 == 0 { 120.0 } else { 30.0 });
    let mut c = mount(500, ControllerOptions::default(), &viewport, &content);
    drive(&mut c, &content, 0);
    assert_window_consistent(&c);

    let m = c.height_model();
    let r = c.visible_range();
    assert!(m.offset_of(r.end) >= 600.0);
    for i in r.iter() {
        assert!(m.is_measured(i), "item {i} rendered but not measured");
    }
}

#[test]
fn scroll_burst_collapses_into_one_cycle() {
    let viewport = MockViewport::new(Some(800.0));
    let content = MockContent::uniform(50.0);
    let (seen, observer) = counter();
    let options = ControllerOptions::default().with_on_scroll(Some(move |_offset: f64| {
        observer.fetch_add(1, Ordering::Relaxed);
    }));
    let mut c = mount(1000, options, &viewport, &content);
    drive(&mut c, &content, 0);

    for (i, now) in (100u64..=110).enumerate() {
        let offset = 100.0 * (i + 1) as f64;
        viewport.set_offset(offset);
        c.on_scroll(offset, now);
    }
    assert_eq!(seen.load(Ordering::Relaxed), 11);

    // One cycle for the whole burst, then one to measure the newly rendered window.
    let (completed, _) = drive(&mut c, &content, 111);
    assert_eq!(completed, 2);
    assert_eq!(c.scroll_offset(), 1100.0);
    // 1100 / 50 = item 22, minus overscan.
    assert_eq!(c.visible_range().start, 14);
}

#[test]
fn trailing_scroll_is_released_after_the_cooldown() {
    let viewport = MockViewport::new(Some(800.0));
    let content = MockContent::uniform(50.0);
    let mut c = mount(1000, ControllerOptions::default(), &viewport, &content);
    drive(&mut c, &content, 0);

    viewport.set_offset(1000.0);
    c.on_scroll(1000.0, 200);
    assert_eq!(c.on_frame(201), CycleOutcome::Waiting);
    assert!(matches!(c.on_frame(202), CycleOutcome::Completed { .. }));

    viewport.set_offset(1500.0);
    c.on_scroll(1500.0, 203);
    assert_eq!(c.phase(), Phase::Idle);
    assert!(c.wants_frame());

    assert_eq!(c.on_frame(205), CycleOutcome::Idle);
    assert_eq!(c.on_frame(207), CycleOutcome::Waiting);
    assert_eq!(c.on_frame(208), CycleOutcome::Waiting);
    assert!(matches!(c.on_frame(209), CycleOutcome::Completed { changed: true }));
    assert_eq!(c.scroll_offset(), 1500.0);
    assert_eq!(c.visible_range().start, 22);
    assert!(!c.wants_frame());
}

#[test]
fn scroll_to_uses_the_current_estimate() {
    let viewport = MockViewport::new(Some(800.0));
    let content = MockContent::uniform(40.0);
    let mut c = mount(1000, ControllerOptions::default(), &viewport, &content);

    assert_eq!(c.scroll_to(500), Some(25_000.0));
    assert_eq!(viewport.last_command(), Some((25_000.0, ScrollBehavior::Instant)));

    drive(&mut c, &content, 0);
    assert_eq!(c.height_model().average_height(), 40.0);
    assert_eq!(c.visible_range().start, 625 - 8);

    assert_eq!(c.scroll_to(500), Some(20_000.0));
    assert_eq!(viewport.last_command(), Some((20_000.0, ScrollBehavior::Instant)));
}

#[test]
fn scroll_to_with_alignment_and_behavior() {
    let viewport = MockViewport::new(Some(800.0));
    let content = MockContent::uniform(50.0);
    let mut c = mount(1000, ControllerOptions::default(), &viewport, &content);

    let opts = ScrollToOptions {
        align: Align::End,
        behavior: ScrollBehavior::Smooth,
    };
    assert_eq!(c.scroll_to_with(100, opts), Some(4_250.0));
    assert_eq!(viewport.last_command(), Some((4_250.0, ScrollBehavior::Smooth)));

    assert_eq!(
        c.scroll_to_offset(-30.0, ScrollBehavior::Instant),
        Some(0.0)
    );
}

#[test]
fn scroll_to_out_of_range_or_without_viewport_is_a_no_op() {
    let mut c = WindowController::new(items(10), ControllerOptions::default());
    assert_eq!(c.scroll_to(3), None);

    let viewport = MockViewport::new(Some(800.0));
    c.attach_viewport(viewport.clone());
    assert_eq!(c.scroll_to(10), None);
    assert_eq!(viewport.last_command(), None);
}

#[test]
fn dataset_change_resets_measurements() {
    let viewport = MockViewport::new(Some(800.0));
    let content = MockContent::uniform(80.0);
    let mut c = mount(100, ControllerOptions::default(), &viewport, &content);
    let (_, now) = drive(&mut c, &content, 0);

    viewport.set_offset(4_000.0);
    c.on_scroll(4_000.0, now);
    drive(&mut c, &content, now + 1);
    assert!(c.height_model().measured_count() > 0);
    assert!(c.visible_range().end > 50);

    assert!(c.set_items(items(50)));
    let m = c.height_model();
    assert_eq!(m.len(), 50);
    assert_eq!(m.measured_count(), 0);
    assert_eq!(m.sample_count(), 0);
    assert_eq!(m.average_height(), 50.0);
    assert!(c.visible_range().end <= 50);
    assert!(c.wants_frame());
    assert_window_consistent(&c);

    drive(&mut c, &content, now + 1_000);
    assert!(c.visible_range().end <= 50);
    assert!(c.visible_items().all(|item| item.index < 50));
    assert_window_consistent(&c);
}

#[test]
fn same_dataset_keeps_measurements() {
    let viewport = MockViewport::new(Some(800.0));
    let content = MockContent::uniform(80.0);
    let mut c = mount(100, ControllerOptions::default(), &viewport, &content);
    drive(&mut c, &content, 0);
    let measured = c.height_model().measured_count();

    let same = c.items().clone();
    assert!(!c.set_items(same));
    assert_eq!(c.height_model().measured_count(), measured);
    assert!(!c.wants_frame());
}

#[test]
fn empty_list_has_empty_window() {
    let viewport = MockViewport::new(Some(800.0));
    let content = MockContent::uniform(50.0);
    let mut c = mount(0, ControllerOptions::default(), &viewport, &content);
    assert_eq!(c.visible_range(), VisibleRange::EMPTY);
    assert_eq!(c.padding(), Padding::ZERO);

    viewport.set_offset(1_234.0);
    c.on_scroll(1_234.0, 0);
    drive(&mut c, &content, 1);
    assert_eq!(c.visible_range(), VisibleRange::EMPTY);
    assert_eq!(c.padding(), Padding::ZERO);
    assert_eq!(c.visible_items().count(), 0);
}

#[test]
fn disconnect_mid_cycle_mutates_nothing() {
    let viewport = MockViewport::new(Some(800.0));
    let content = MockContent::uniform(70.0);
    let mut c = mount(100, ControllerOptions::default(), &viewport, &content);
    let before = c.height_model().snapshot();
    let range = c.visible_range();
    let padding = c.padding();

    content.disconnect_after(5);
    assert_eq!(c.on_frame(0), CycleOutcome::Waiting);
    assert_eq!(
        c.on_frame(16),
        CycleOutcome::Skipped(CycleAbort::Disconnected)
    );
    assert_eq!(c.phase(), Phase::Idle);
    assert_eq!(c.height_model().snapshot(), before);
    assert_eq!(c.visible_range(), range);
    assert_eq!(c.padding(), padding);
}

#[test]
fn missing_content_defers_the_cycle() {
    let viewport = MockViewport::new(Some(800.0));
    let content = MockContent::uniform(50.0);
    let mut c = WindowController::new(items(100), ControllerOptions::default());
    content.render(c.visible_range());
    c.attach_viewport(viewport.clone());

    c.on_frame(0);
    assert_eq!(
        c.on_frame(16),
        CycleOutcome::Skipped(CycleAbort::ContentDetached)
    );
    assert!(!c.wants_frame());

    c.attach_content(content.clone());
    let (completed, _) = drive(&mut c, &content, 32);
    assert_eq!(completed, 1);
}

#[test]
fn detached_viewport_defers_the_cycle() {
    let viewport = MockViewport::new(Some(800.0));
    let content = MockContent::uniform(50.0);
    let mut c = mount(100, ControllerOptions::default(), &viewport, &content);
    c.detach_viewport();

    c.on_frame(0);
    assert_eq!(
        c.on_frame(16),
        CycleOutcome::Skipped(CycleAbort::ViewportDetached)
    );
    assert_eq!(c.height_model().measured_count(), 0);
}

#[test]
fn teardown_cancels_pending_work() {
    let viewport = MockViewport::new(Some(800.0));
    let content = MockContent::uniform(50.0);
    let (seen, observer) = counter();
    let options = ControllerOptions::default().with_on_scroll(Some(move |_offset: f64| {
        observer.fetch_add(1, Ordering::Relaxed);
    }));
    let mut c = mount(100, options, &viewport, &content);
    assert!(c.wants_frame());

    c.teardown();
    assert!(c.is_destroyed());
    assert!(!c.wants_frame());
    assert_eq!(c.on_frame(0), CycleOutcome::Skipped(CycleAbort::Destroyed));

    c.on_scroll(500.0, 10);
    c.on_resize();
    c.on_commit();
    assert_eq!(seen.load(Ordering::Relaxed), 0);
    assert_eq!(c.scroll_to(5), None);
    assert!(!c.set_items(items(3)));
    assert_eq!(c.phase(), Phase::Destroyed);
    assert_eq!(c.height_model().measured_count(), 0);
}

#[test]
fn on_change_fires_only_when_the_window_moves() {
    let viewport = MockViewport::new(Some(800.0));
    let content = MockContent::uniform(50.0);
    let (changes, sink) = counter();
    let options = ControllerOptions::default().with_on_change(Some(
        move |_range: VisibleRange, _padding: Padding| {
            sink.fetch_add(1, Ordering::Relaxed);
        },
    ));
    let mut c = mount(1000, options, &viewport, &content);
    assert_eq!(changes.load(Ordering::Relaxed), 1);

    let (_, now) = drive(&mut c, &content, 0);
    assert_eq!(changes.load(Ordering::Relaxed), 1);

    viewport.set_offset(2_000.0);
    c.on_scroll(2_000.0, now);
    drive(&mut c, &content, now + 1);
    assert_eq!(changes.load(Ordering::Relaxed), 2);
}

#[test]
fn fixed_item_height_ignores_measurements() {
    let viewport = MockViewport::new(Some(800.0));
    let content = MockContent::uniform(100.0);
    let options = ControllerOptions::default().with_item_height(Some(30.0));
    let mut c = mount(1000, options, &viewport, &content);
    drive(&mut c, &content, 0);

    let m = c.height_model();
    assert_eq!(m.measured_count(), 0);
    assert_eq!(m.sample_count(), 0);
    assert_eq!(c.visible_range(), VisibleRange { start: 0, end: 35 });
    assert_eq!(c.padding(), Padding { top: 0.0, bottom: 965.0 * 30.0 });
}

#[test]
fn visible_items_pair_indexes_with_data() {
    let viewport = MockViewport::new(Some(800.0));
    let content = MockContent::uniform(50.0);
    let mut c = mount(1000, ControllerOptions::default(), &viewport, &content);
    viewport.set_offset(5_000.0);
    c.on_scroll(5_000.0, 0);
    drive(&mut c, &content, 1);

    let mut out = Vec::new();
    c.collect_visible_items(&mut out);
    assert_eq!(out.len(), c.visible_range().len());
    assert_eq!(out[0].index, 92);
    for item in &out {
        assert_eq!(*item.data, item.index as u32 * 10);
    }
}

#[test]
fn throttle_leading_and_trailing_edges() {
    let mut t = Throttle::new(10);
    assert!(t.hit(100));
    assert!(!t.hit(101));
    assert!(!t.hit(105));
    assert!(t.is_pending());
    assert!(!t.poll(109));
    assert!(t.poll(110));
    assert!(!t.is_pending());
    assert!(!t.poll(200));
    assert!(t.hit(200));
}

#[test]
fn throttle_treats_a_backwards_clock_as_elapsed() {
    let mut t = Throttle::new(10);
    assert!(t.hit(100));
    assert!(t.hit(50));
    t.reset();
    assert!(!t.is_pending());
    assert!(t.hit(51));
}

#[derive(Clone, Debug)]
enum Event {
    Scroll(f64),
    Frame,
    Resize,
    SetLen(usize),
    ScrollTo(usize),
}

fn event_strategy() -> impl Strategy<Value = Event> {
    prop_oneof![
        2 => (0.0f64..60_000.0).prop_map(Event::Scroll),
        5 => Just(Event::Frame),
        1 => Just(Event::Resize),
        1 => (0usize..600).prop_map(Event::SetLen),
        1 => (0usize..700).prop_map(Event::ScrollTo),
    ]
}

proptest! {
    #[test]
    fn window_stays_consistent_under_random_events(
        len in 0usize..600,
        events in proptest::collection::vec(event_strategy(), 1..120),
    ) {
        let viewport = MockViewport::new(Some(700.0));
        let content = MockContent::new(|i| 20.0 + (i % 7) as f64 * 15.0);
        let mut c = mount(len, ControllerOptions::default(), &viewport, &content);
        let mut now = 0u64;
        for event in events {
            now += 5;
            match event {
                Event::Scroll(offset) => {
                    viewport.set_offset(offset);
                    c.on_scroll(offset, now);
                }
                Event::Frame => {
                    if let CycleOutcome::Completed { .. } = c.on_frame(now) {
                        content.render(c.visible_range());
                        c.on_commit();
                    }
                }
                Event::Resize => c.on_resize(),
                Event::SetLen(n) => {
                    c.set_items(items(n));
                }
                Event::ScrollTo(i) => {
                    let target = c.scroll_to(i);
                    prop_assert_eq!(target.is_some(), i < c.item_count());
                }
            }

            let r = c.visible_range();
            let n = c.item_count();
            prop_assert!(r.start <= r.end && r.end <= n);
            prop_assert_eq!(r.is_empty(), n == 0);
            prop_assert_eq!(c.height_model().len(), n);
            prop_assert!(!matches!(c.phase(), Phase::Measuring | Phase::Recomputing));
            let p = c.padding();
            let rendered = c.height_model().height_between(r.start, r.end);
            prop_assert!(p.top >= 0.0 && p.bottom >= 0.0);
            prop_assert!(approx_eq(p.top + rendered + p.bottom, c.total_height()));
        }
    }
}
