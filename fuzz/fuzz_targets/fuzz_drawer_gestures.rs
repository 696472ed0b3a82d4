#![no_main]

use std::time::Duration;

use arbitrary::Arbitrary;
use drawer_core::{Drawer, DrawerConfig, PanelState, ViewportMetrics};
use libfuzzer_sys::fuzz_target;
use web_time::Instant;

#[derive(Debug, Arbitrary)]
enum Op {
    Open,
    Close,
    Tap,
    DragStart,
    DragMove(f64),
    DragEnd(f64, f64),
    DragEndEstimated(f64),
    DragCancel,
    Scroll(f64, f64, f64),
    TouchStart(f64),
    TouchMove(f64),
    TouchEnd,
    Resize(f64),
    Tick(u8),
}

#[derive(Debug, Arbitrary)]
struct Input {
    viewport: f64,
    ops: Vec<Op>,
}

fuzz_target!(|input: Input| {
    let viewport = ViewportMetrics::shared(input.viewport);
    let Ok(mut drawer) = Drawer::<()>::new(DrawerConfig::default(), viewport) else {
        return;
    };
    let mut now = Instant::now();

    for op in input.ops.into_iter().take(512) {
        match op {
            Op::Open => {
                drawer.open();
            }
            Op::Close => {
                drawer.close();
            }
            Op::Tap => {
                drawer.tap_handle();
            }
            Op::DragStart => {
                let _ = drawer.drag_start(now);
            }
            Op::DragMove(delta) => {
                drawer.drag_move(delta, now);
            }
            Op::DragEnd(delta, velocity) => {
                drawer.drag_end(delta, velocity);
            }
            Op::DragEndEstimated(delta) => {
                drawer.drag_end_estimated(delta, now);
            }
            Op::DragCancel => {
                drawer.drag_cancel();
            }
            Op::Scroll(offset, content, visible) => drawer.scroll(offset, content, visible),
            Op::TouchStart(y) => drawer.touch_start(y),
            Op::TouchMove(y) => {
                let applied = drawer.touch_move(y);
                assert!(applied.is_nan() || applied <= 0.0);
                assert!(applied.is_nan() || applied >= -100.0, "rubber band past cap");
            }
            Op::TouchEnd => {
                drawer.touch_end();
            }
            Op::Resize(height) => drawer.viewport().set_height(height),
            Op::Tick(ms) => {
                let dt = Duration::from_millis(u64::from(ms));
                now += dt;
                drawer.tick(dt);
            }
        }

        // Post-conditions that must always hold:
        if drawer.is_dragging() {
            let extent = drawer.geometry().sheet_extent;
            assert!(extent.is_nan() || extent >= 5.0, "extent below floor");
        }
        if drawer.is_closing() {
            assert_eq!(drawer.state(), PanelState::Closed);
            assert!(drawer.is_mounted(), "unmounted mid-close");
        }
        if drawer.state().is_open() {
            assert!(drawer.is_mounted());
            assert!(drawer.companion_mounted());
        }
    }
});
