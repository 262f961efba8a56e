// Example: drive a controller from a simulated host loop.
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use windowing_controller::{
    ControllerOptions, CycleOutcome, MeasurementSurface, ScrollBehavior, ScrollSource,
    VisibleRange, WindowController,
};

#[derive(Clone, Default)]
struct Viewport(Rc<RefCell<f64>>);

impl ScrollSource for Viewport {
    fn scroll_offset(&self) -> f64 {
        *self.0.borrow()
    }

    fn viewport_height(&self) -> Option<f64> {
        Some(600.0)
    }

    fn scroll_to(&mut self, offset: f64, _behavior: ScrollBehavior) {
        *self.0.borrow_mut() = offset;
    }
}

#[derive(Clone, Default)]
struct Content(Rc<RefCell<VisibleRange>>);

impl MeasurementSurface for Content {
    fn measure(&self, index: usize) -> Option<f64> {
        // Every fifth row wraps onto a second line.
        self.0
            .borrow()
            .contains(index)
            .then(|| if index % 5 == 0 { 48.0 } else { 24.0 })
    }
}

fn main() {
    let rows: Arc<[String]> = (0..10_000).map(|i| format!("row {i}")).collect();
    let options = ControllerOptions::default().with_on_change(Some(
        |range: VisibleRange, padding: windowing_controller::Padding| {
            println!("render {range:?} padding={padding:?}");
        },
    ));
    let mut c = WindowController::new(rows, options);

    let viewport = Viewport::default();
    let content = Content::default();
    *content.0.borrow_mut() = c.visible_range();
    c.attach_viewport(viewport.clone());
    c.attach_content(content.clone());

    let mut now_ms = 0u64;
    let frame = |c: &mut WindowController<String>, now_ms: u64| {
        if let CycleOutcome::Completed { .. } = c.on_frame(now_ms) {
            *content.0.borrow_mut() = c.visible_range();
            c.on_commit();
        }
    };

    // A fling: scroll events every 4 ms, frames every 16 ms.
    for step in 0..200u64 {
        now_ms += 4;
        let offset = step as f64 * 90.0;
        *viewport.0.borrow_mut() = offset;
        c.on_scroll(offset, now_ms);
        if step % 4 == 0 {
            frame(&mut c, now_ms);
        }
    }
    while c.wants_frame() {
        now_ms += 16;
        frame(&mut c, now_ms);
    }

    if let Some(target) = c.scroll_to(5_000) {
        println!("scroll_to(5000) -> {target}");
    }
    while c.wants_frame() {
        now_ms += 16;
        frame(&mut c, now_ms);
    }
    let first = c.visible_items().next().map(|item| item.data.as_str());
    println!("first rendered row: {first:?}, total_height={}", c.total_height());

    c.teardown();
}
