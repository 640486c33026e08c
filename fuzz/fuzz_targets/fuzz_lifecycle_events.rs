#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use trail_core::config::CursorSettings;
use trail_core::event::Event;
use trail_core::geometry::Viewport;
use trail_runtime::{CursorController, LifecycleState};
use trail_web::{WebHost, dispatch, step_frame};

#[derive(Debug, Arbitrary)]
enum Op {
    Move(i16, i16),
    Enter,
    Leave,
    Visibility(bool),
    Resize(u16, u16),
    Frame,
    Detach(bool),
}

fuzz_target!(|ops: Vec<Op>| {
    if ops.len() > 512 {
        return;
    }
    let mut c = CursorController::mount(
        WebHost::new(Viewport::new(1280.0, 800.0)),
        CursorSettings::default(),
    )
    .expect("mount on a web host cannot fail");

    for op in ops {
        let event = match op {
            Op::Move(x, y) => Some(Event::pointer_move(f64::from(x), f64::from(y))),
            Op::Enter => Some(Event::PointerEnter),
            Op::Leave => Some(Event::PointerLeave),
            Op::Visibility(hidden) => Some(Event::Visibility { hidden }),
            Op::Resize(w, h) => Some(Event::Resize {
                width: f64::from(w),
                height: f64::from(h),
            }),
            Op::Frame => {
                step_frame(&mut c);
                None
            }
            Op::Detach(detached) => {
                c.host_mut().surface_mut().set_attached(!detached);
                None
            }
        };
        if let Some(event) = event {
            dispatch(&mut c, &event).expect("web host dispatch cannot fail");
        }

        let pending = c.host().scheduler_ref().pending().len();
        assert!(pending <= 1, "more than one frame outstanding");
        assert_eq!(pending == 1, c.state() == LifecycleState::Active);
    }

    c.teardown().expect("teardown on a web host cannot fail");
    assert!(c.host().events_ref().listeners().is_empty());
    assert!(c.host().scheduler_ref().pending().is_empty());
});
