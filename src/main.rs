//! Main module for the Misbaha counter using Yew.
//! Wires the counter session, view components and browser side effects.

use misbaha::config::{FLASH_MS, MODAL_ENTER_DELAY_MS, MODAL_EXIT_MS, RESET_CONFIRM_MESSAGE};
use misbaha::Target;
use yew::prelude::*;

mod components;
mod haptics;
mod hooks;

use components::{CounterDial, SettingsModal, Toolbar};
use hooks::{use_flash, use_key_press, use_modal, use_tasbih};

/// Ask before zeroing the count. A browser that refuses the dialog counts
/// as "no".
fn confirm_reset() -> bool {
    gloo_utils::window()
        .confirm_with_message(RESET_CONFIRM_MESSAGE)
        .unwrap_or(false)
}

#[function_component]
pub fn App() -> Html {
    let (flashing, flash) = use_flash(FLASH_MS);
    let tasbih = use_tasbih(flash);
    let modal = use_modal(MODAL_ENTER_DELAY_MS, MODAL_EXIT_MS);

    // Spacebar counts the same as a tap.
    use_key_press("Space", tasbih.increment.clone());

    let on_tap = tasbih.increment.reform(|_: MouseEvent| ());

    let on_reset = {
        let reset = tasbih.reset.clone();
        Callback::from(move |_: MouseEvent| {
            if confirm_reset() {
                reset.emit(());
            }
        })
    };

    let on_toggle_haptic = tasbih.toggle_haptic.reform(|_: MouseEvent| ());
    let on_settings = modal.open.reform(|_: MouseEvent| ());

    let on_save_settings = {
        let configure = tasbih.configure.clone();
        let close = modal.close.clone();
        Callback::from(move |(phrase, target): (String, Target)| {
            configure.emit((phrase, target));
            close.emit(());
        })
    };

    let state = &tasbih.state;

    html! {
        <main class="misbaha">
            <div class="dhikr-text">{ state.selected_phrase.clone() }</div>

            <CounterDial
                count={state.count}
                target={state.target}
                fraction={state.progress_fraction()}
                {flashing}
                taps={tasbih.taps}
                onclick={on_tap}
            />

            <Toolbar
                haptic_enabled={state.haptic_enabled}
                {on_reset}
                {on_toggle_haptic}
                {on_settings}
            />

            <SettingsModal
                phase={modal.phase}
                phrase={AttrValue::from(state.selected_phrase.clone())}
                target={state.target}
                on_save={on_save_settings}
                on_close={modal.close.clone()}
            />
        </main>
    }
}

/// Entry point: installs the panic hook and mounts the app.
fn main() {
    console_error_panic_hook::set_once();
    yew::Renderer::<App>::new().render();
}
