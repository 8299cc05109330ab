//! Yew view components for the counter screen.
//!
//! Everything here renders from props; the session itself lives in
//! [`crate::hooks::use_tasbih`].

use crate::hooks::ModalPhase;
use misbaha::config::{PHRASES, RING_RADIUS, TARGET_PRESETS};
use misbaha::utils::{
    is_known_phrase, ring_circumference, ring_dash_offset, target_button_label, target_label,
};
use misbaha::Target;
use web_sys::HtmlSelectElement;
use yew::prelude::*;

/// Circular progress indicator. `fraction` is the share of the ring drawn.
#[derive(Properties, PartialEq)]
pub struct ProgressRingProps {
    pub fraction: f64,
}

#[function_component(ProgressRing)]
pub fn progress_ring(props: &ProgressRingProps) -> Html {
    let size = (RING_RADIUS + 12.0) * 2.0;
    let center = size / 2.0;
    let circumference = ring_circumference(RING_RADIUS);
    let offset = ring_dash_offset(props.fraction, RING_RADIUS);

    html! {
        <svg class="progress-ring" width={size.to_string()} height={size.to_string()}>
            <circle class="progress-ring-track"
                cx={center.to_string()} cy={center.to_string()} r={RING_RADIUS.to_string()} />
            <circle class="progress-ring-bar"
                cx={center.to_string()} cy={center.to_string()} r={RING_RADIUS.to_string()}
                style={format!(
                    "stroke-dasharray: {circumference} {circumference}; stroke-dashoffset: {offset};"
                )} />
        </svg>
    }
}

/// Tap target holding the ring, the count and the current target.
#[derive(Properties, PartialEq)]
pub struct CounterDialProps {
    pub count: u64,
    pub target: Target,
    pub fraction: f64,
    pub flashing: bool,
    /// Keys the pulse element so each tap remounts it and replays the animation.
    pub taps: u64,
    pub onclick: Callback<MouseEvent>,
}

#[function_component(CounterDial)]
pub fn counter_dial(props: &CounterDialProps) -> Html {
    html! {
        <div class="click-area" onclick={props.onclick.clone()}>
            <ProgressRing fraction={props.fraction} />
            if props.taps > 0 {
                <span key={props.taps.to_string()} class="pulse animate-pulse-custom" />
            }
            <div class="dial-text">
                <div class={classes!("count-display", props.flashing.then_some("flash"))}>
                    { props.count }
                </div>
                <div class="target-display">{ target_label(props.target) }</div>
            </div>
        </div>
    }
}

/// Reset, vibration toggle and settings buttons.
#[derive(Properties, PartialEq)]
pub struct ToolbarProps {
    pub haptic_enabled: bool,
    pub on_reset: Callback<MouseEvent>,
    pub on_toggle_haptic: Callback<MouseEvent>,
    pub on_settings: Callback<MouseEvent>,
}

#[function_component(Toolbar)]
pub fn toolbar(props: &ToolbarProps) -> Html {
    let vibrate_class = if props.haptic_enabled {
        "toolbar-icon active"
    } else {
        "toolbar-icon muted"
    };

    html! {
        <div class="toolbar">
            <button class="toolbar-btn" title="تصفير" onclick={props.on_reset.clone()}>
                <div class="toolbar-icon">{ "↺" }</div>
            </button>
            <button class="toolbar-btn" title="الاهتزاز"
                aria-pressed={props.haptic_enabled.to_string()}
                onclick={props.on_toggle_haptic.clone()}>
                <div class={vibrate_class}>{ "📳" }</div>
            </button>
            <button class="toolbar-btn" title="الإعدادات" onclick={props.on_settings.clone()}>
                <div class="toolbar-icon">{ "⚙" }</div>
            </button>
        </div>
    }
}

/// Phrase and target picker. Edits stay local until "save".
#[derive(Properties, PartialEq)]
pub struct SettingsModalProps {
    pub phase: ModalPhase,
    pub phrase: AttrValue,
    pub target: Target,
    pub on_save: Callback<(String, Target)>,
    pub on_close: Callback<()>,
}

#[function_component(SettingsModal)]
pub fn settings_modal(props: &SettingsModalProps) -> Html {
    let draft_phrase = use_state(|| props.phrase.to_string());
    let draft_target = use_state(|| props.target);

    // Start every opening from the live values.
    {
        let draft_phrase = draft_phrase.clone();
        let draft_target = draft_target.clone();
        let phrase = props.phrase.clone();
        let target = props.target;
        use_effect_with(props.phase == ModalPhase::Entering, move |&entering| {
            if entering {
                draft_phrase.set(phrase.to_string());
                draft_target.set(target);
            }
            || ()
        });
    }

    if !props.phase.is_mounted() {
        return html! {};
    }

    let on_phrase_change = {
        let draft_phrase = draft_phrase.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            draft_phrase.set(select.value());
        })
    };

    let on_save = {
        let on_save = props.on_save.clone();
        let draft_phrase = draft_phrase.clone();
        let draft_target = draft_target.clone();
        Callback::from(move |_: MouseEvent| {
            on_save.emit(((*draft_phrase).clone(), *draft_target));
        })
    };

    let on_close = props.on_close.reform(|_: MouseEvent| ());
    let active = props.phase.is_active();

    html! {
        <div class={classes!("settings-modal", active.then_some("modal-active"))}>
            <div class={classes!("modal-content", active.then_some("modal-content-active"))}>
                <div class="modal-header">
                    <h2>{ "الإعدادات" }</h2>
                    <button class="modal-close" onclick={on_close}>{ "✕" }</button>
                </div>

                <label for="dhikr-select">{ "الذكر" }</label>
                <select id="dhikr-select" onchange={on_phrase_change}>
                    { render_phrase_options(&draft_phrase) }
                </select>

                <label>{ "الهدف" }</label>
                <div class="target-options">
                    { TARGET_PRESETS.iter().filter_map(|&raw| Target::from_raw(raw)).map(|preset| {
                        let draft_target = draft_target.clone();
                        let class = classes!(
                            "target-btn",
                            (*draft_target == preset).then_some("active-target")
                        );
                        html! {
                            <button {class}
                                onclick={Callback::from(move |_: MouseEvent| draft_target.set(preset))}>
                                { target_button_label(preset) }
                            </button>
                        }
                    }).collect::<Html>() }
                </div>

                <button class="btn-primary save-settings" onclick={on_save}>{ "حفظ" }</button>
            </div>
        </div>
    }
}

/// Options for the phrase picker. A restored phrase that is not in the
/// fixed list is kept as an extra first option so it stays selected.
fn render_phrase_options(selected: &str) -> Html {
    let extra = (!is_known_phrase(selected)).then_some(selected);
    extra
        .into_iter()
        .chain(PHRASES.iter().copied())
        .map(|phrase| {
            html! {
                <option value={phrase.to_string()} selected={phrase == selected}>{ phrase }</option>
            }
        })
        .collect::<Html>()
}
