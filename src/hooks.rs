use crate::haptics;
use gloo_timers::callback::Timeout;
use misbaha::{BrowserStorage, CounterState, Persistence, Target, Tasbih};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::KeyboardEvent;
use yew::prelude::*;

/// Rendered snapshot of the counting session plus the operations on it.
#[derive(Clone)]
pub struct TasbihHandle {
    /// State as of the last operation.
    pub state: CounterState,
    /// Bumped on every increment; used to restart the tap animation.
    pub taps: u64,
    pub increment: Callback<()>,
    /// Resets without asking. Confirmation happens in the caller.
    pub reset: Callback<()>,
    pub configure: Callback<(String, Target)>,
    pub toggle_haptic: Callback<()>,
}

/// Owns the session for the lifetime of the component.
///
/// The session is restored from `localStorage` on first render and written
/// back after every operation. Haptics are played here; `on_target_reached`
/// fires after the increment that completes a cycle.
#[hook]
pub fn use_tasbih(on_target_reached: Callback<()>) -> TasbihHandle {
    let session = use_mut_ref(|| Tasbih::restore(Persistence::new(BrowserStorage)));
    let snapshot = use_state(|| session.borrow().state().clone());
    let taps = use_state(|| 0u64);

    let increment = {
        let session = session.clone();
        let snapshot = snapshot.clone();
        let taps = taps.clone();
        Callback::from(move |_: ()| {
            let outcome = session.borrow_mut().increment();
            haptics::play_all(&outcome.haptics);
            snapshot.set(session.borrow().state().clone());
            taps.set(taps.wrapping_add(1));
            if outcome.target_reached {
                on_target_reached.emit(());
            }
        })
    };

    let reset = {
        let session = session.clone();
        let snapshot = snapshot.clone();
        Callback::from(move |_: ()| {
            session.borrow_mut().reset();
            snapshot.set(session.borrow().state().clone());
        })
    };

    let configure = {
        let session = session.clone();
        let snapshot = snapshot.clone();
        Callback::from(move |(phrase, target): (String, Target)| {
            session.borrow_mut().configure(&phrase, target);
            snapshot.set(session.borrow().state().clone());
        })
    };

    let toggle_haptic = {
        let session = session.clone();
        let snapshot = snapshot.clone();
        Callback::from(move |_: ()| {
            let confirm = session.borrow_mut().toggle_haptic();
            if let Some(pattern) = confirm {
                haptics::play(pattern);
            }
            snapshot.set(session.borrow().state().clone());
        })
    };

    TasbihHandle {
        state: (*snapshot).clone(),
        taps: *taps,
        increment,
        reset,
        configure,
        toggle_haptic,
    }
}

/// A flag that turns itself off `duration_ms` after the last trigger.
#[hook]
pub fn use_flash(duration_ms: u32) -> (bool, Callback<()>) {
    let active = use_state(|| false);
    let timer = use_mut_ref(|| None::<Timeout>);

    let trigger = {
        let active = active.clone();
        Callback::from(move |_: ()| {
            active.set(true);
            let active = active.clone();
            // Replacing the handle cancels a pending revert.
            *timer.borrow_mut() = Some(Timeout::new(duration_ms, move || active.set(false)));
        })
    };

    (*active, trigger)
}

/// Stages of a dialog's enter/exit transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalPhase {
    Hidden,
    /// Mounted but not yet active, so the CSS transition has a start state.
    Entering,
    Open,
    /// Active class removed; unmounts once the exit transition has run.
    Leaving,
}

impl ModalPhase {
    pub fn is_mounted(self) -> bool {
        self != ModalPhase::Hidden
    }

    pub fn is_active(self) -> bool {
        self == ModalPhase::Open
    }
}

#[derive(Clone)]
pub struct ModalHandle {
    pub phase: ModalPhase,
    pub open: Callback<()>,
    pub close: Callback<()>,
}

#[hook]
pub fn use_modal(enter_delay_ms: u32, exit_ms: u32) -> ModalHandle {
    let phase = use_state(|| ModalPhase::Hidden);
    let timer = use_mut_ref(|| None::<Timeout>);

    let open = {
        let phase = phase.clone();
        let timer = timer.clone();
        Callback::from(move |_: ()| {
            phase.set(ModalPhase::Entering);
            let phase = phase.clone();
            *timer.borrow_mut() = Some(Timeout::new(enter_delay_ms, move || {
                phase.set(ModalPhase::Open)
            }));
        })
    };

    let close = {
        let phase = phase.clone();
        Callback::from(move |_: ()| {
            phase.set(ModalPhase::Leaving);
            let phase = phase.clone();
            *timer.borrow_mut() = Some(Timeout::new(exit_ms, move || {
                phase.set(ModalPhase::Hidden)
            }));
        })
    };

    ModalHandle {
        phase: *phase,
        open,
        close,
    }
}

/// Calls `on_press` for every document-level `keydown` whose `code` matches.
#[hook]
pub fn use_key_press(code: &'static str, on_press: Callback<()>) {
    // The listener is attached once; it always reads the latest callback.
    let latest = use_mut_ref(|| on_press.clone());
    *latest.borrow_mut() = on_press;

    use_effect_with(code, move |&code| {
        let listener = Closure::<dyn Fn(KeyboardEvent)>::new(move |e: KeyboardEvent| {
            if e.code() == code {
                let on_press = latest.borrow().clone();
                on_press.emit(());
            }
        });
        let document = gloo_utils::document();
        let attached = document
            .add_event_listener_with_callback("keydown", listener.as_ref().unchecked_ref())
            .is_ok();
        if !attached {
            log::warn!("Could not attach '{}' key listener", code);
        }

        move || {
            if attached {
                let _ = document
                    .remove_event_listener_with_callback("keydown", listener.as_ref().unchecked_ref());
            }
            drop(listener);
        }
    });
}
