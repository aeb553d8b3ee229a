use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

use cherrybar_core::{
    Command, Easing, Effect, FixedMode, OverrideSelection, Position, PrizePulse, RandomSource,
    ReelId, ReelOverride, Session, Symbol,
};

const FRAME_MS: i32 = 16;

/// `Math.random()`, already uniform in `[0, 1)`.
struct JsRandom;

impl RandomSource for JsRandom {
    fn next_unit(&mut self) -> f64 {
        js_sys::Math::random()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct ReelView {
    offset: f64,
    duration_ms: u32,
    easing: Easing,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct PrizeView {
    id: u64,
    amount: u32,
    pulse: PrizePulse,
}

#[derive(Debug, Clone, Default, PartialEq)]
struct View {
    reels: [ReelView; 3],
    spinning: bool,
    balance: i64,
    displayed: i64,
    prize: Option<PrizeView>,
    pulses: u64,
    error: Option<String>,
}

impl View {
    /// A lost completion timer leaves the session spinning; surface it.
    fn note_timer(&mut self, scheduled: Result<(), String>, what: &str) {
        if let Err(e) = scheduled {
            self.error = Some(format!("{what} timer not scheduled: {e}"));
        }
    }
}

/// Operator panel state; pushed to the session on every change.
#[derive(Debug, Clone, Copy, Default)]
struct Controls {
    fixed: bool,
    selection: OverrideSelection,
}

impl Controls {
    fn mode(&self) -> FixedMode {
        if self.fixed {
            FixedMode::On(self.selection)
        } else {
            FixedMode::Off
        }
    }
}

/// Runs `f` once after `ms`.
fn schedule(ms: u32, f: impl FnOnce() + 'static) -> Result<(), String> {
    let window = web_sys::window().ok_or("no window to schedule timers on")?;
    let callback = Closure::once_into_js(f);
    window
        .set_timeout_with_callback_and_timeout_and_arguments_0(
            callback.unchecked_ref(),
            ms.min(i32::MAX as u32) as i32,
        )
        .map(|_| ())
        .map_err(|e| format!("setTimeout failed: {e:?}"))
}

#[derive(Clone)]
struct Game {
    session: Rc<RefCell<Session<JsRandom>>>,
    view: Rc<RefCell<View>>,
    controls: Rc<RefCell<Controls>>,
    redraw: UseForceUpdateHandle,
}

impl Game {
    fn send(&self, command: Command) {
        let result = self.session.borrow_mut().dispatch(command);
        match result {
            Ok(effects) => {
                for effect in effects {
                    self.apply(effect);
                }
            }
            Err(e) => self.view.borrow_mut().error = Some(e.to_string()),
        }
        self.redraw.force_update();
    }

    fn apply(&self, effect: Effect) {
        let mut view = self.view.borrow_mut();
        match effect {
            Effect::SpinStarted { balance, .. } => {
                view.spinning = true;
                view.balance = balance;
                view.error = None;
            }
            Effect::AnimateReel(animation) => {
                view.reels[animation.reel.index()] = ReelView {
                    offset: animation.to_offset,
                    duration_ms: animation.duration_ms,
                    easing: animation.easing,
                };
                let game = self.clone();
                let scheduled = schedule(animation.duration_ms, move || {
                    game.send(Command::ReelAnimationCompleted(animation.reel))
                });
                view.note_timer(scheduled, &format!("{:?} reel", animation.reel));
            }
            Effect::SpinFinished(report) => {
                view.spinning = false;
                view.balance = report.balance;
            }
            Effect::ShowPrize { amount, pulse } => {
                view.pulses += 1;
                let id = view.pulses;
                view.prize = Some(PrizeView { id, amount, pulse });
                let game = self.clone();
                let scheduled = schedule(pulse.total_ms(), move || {
                    let mut view = game.view.borrow_mut();
                    if view.prize.map(|p| p.id) == Some(id) {
                        view.prize = None;
                    }
                    drop(view);
                    game.redraw.force_update();
                });
                view.note_timer(scheduled, "prize pulse");
            }
            Effect::RenderBalance { balance, displayed } => {
                view.balance = balance;
                view.displayed = displayed;
            }
        }
    }

    fn push_controls(&self) {
        let mode = self.controls.borrow().mode();
        self.send(Command::OverrideChanged(mode));
    }
}

#[function_component(App)]
fn app() -> Html {
    let game = Game {
        session: use_mut_ref(|| Session::with_defaults(JsRandom)),
        view: use_mut_ref(View::default),
        controls: use_mut_ref(Controls::default),
        redraw: use_force_update(),
    };

    {
        let game = game.clone();
        use_effect_with((), move |_| {
            let tick = Closure::<dyn FnMut()>::new(move || game.send(Command::FrameTick));
            let handle = web_sys::window().and_then(|w| {
                w.set_interval_with_callback_and_timeout_and_arguments_0(
                    tick.as_ref().unchecked_ref(),
                    FRAME_MS,
                )
                .ok()
            });
            move || {
                if let (Some(window), Some(id)) = (web_sys::window(), handle) {
                    window.clear_interval_with_handle(id);
                }
                drop(tick);
            }
        });
    }

    let on_spin = {
        let game = game.clone();
        Callback::from(move |_: MouseEvent| game.send(Command::SpinRequested))
    };

    let on_fixed = {
        let game = game.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            game.controls.borrow_mut().fixed = input.checked();
            game.push_controls();
        })
    };

    let on_balance = {
        let game = game.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            game.send(Command::BalanceEdited(input.value()));
        })
    };

    let view = game.view.borrow().clone();
    let controls = *game.controls.borrow();

    html! {
        <div class="cabinet">
            <h1>{"Cherry Bar"}</h1>
            <div class="balance">{format!("Balance: {}", view.displayed)}</div>
            <div class="reels">
                { for view.reels.iter().map(|r| html! { <Reel view={*r} /> }) }
                <div class="prize-layer">
                    if let Some(prize) = view.prize {
                        <div
                            key={prize.id.to_string()}
                            class="prize"
                            style={prize_style(&prize.pulse)}
                        >
                            {prize.amount.to_string()}
                        </div>
                    }
                </div>
            </div>
            <button class="spin" onclick={on_spin} disabled={view.spinning || view.balance <= 0}>
                {"Spin"}
            </button>
            <fieldset class="fixed-mode">
                <label>
                    <input type="checkbox" checked={controls.fixed} onchange={on_fixed} />
                    {"Fixed mode"}
                </label>
                <label>
                    {"Balance "}
                    <input
                        type="number"
                        value={view.balance.to_string()}
                        disabled={controls.fixed}
                        oninput={on_balance}
                    />
                </label>
                { for ReelId::ALL.into_iter().map(|reel| {
                    reel_picker(&game, reel, controls.selection.0[reel.index()])
                }) }
            </fieldset>
            if let Some(error) = &view.error {
                <p class="error">{error.clone()}</p>
            }
        </div>
    }
}

fn prize_style(pulse: &PrizePulse) -> String {
    format!(
        "--scale-ms: {}ms; --float-ms: {}ms; --float-px: -{}px; \
         --fade-delay-ms: {}ms; --fade-ms: {}ms; --ease: {};",
        pulse.scale_up_ms,
        pulse.float_ms,
        pulse.float_px,
        pulse.fade_delay_ms,
        pulse.fade_ms,
        pulse.easing.css()
    )
}

fn reel_picker(game: &Game, reel: ReelId, current: ReelOverride) -> Html {
    let on_symbol = {
        let game = game.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            let Some(symbol) = select.value().parse::<u8>().ok().and_then(Symbol::new) else {
                return;
            };
            let mut controls = game.controls.borrow_mut();
            let position = controls.selection.0[reel.index()].position;
            controls.selection.set(reel, ReelOverride { symbol, position });
            drop(controls);
            game.push_controls();
        })
    };
    let on_position = {
        let game = game.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            let Ok(position) = select.value().parse::<Position>() else {
                return;
            };
            let mut controls = game.controls.borrow_mut();
            let symbol = controls.selection.0[reel.index()].symbol;
            controls.selection.set(reel, ReelOverride { symbol, position });
            drop(controls);
            game.push_controls();
        })
    };

    html! {
        <div class="picker">
            <select onchange={on_symbol}>
                { for Symbol::ALL.into_iter().map(|s| html! {
                    <option value={s.index().to_string()} selected={s == current.symbol}>
                        {format!("{} ({})", s, s.label())}
                    </option>
                }) }
            </select>
            <select onchange={on_position}>
                { for [
                    ("top", Position::Top),
                    ("center", Position::Center),
                    ("bottom", Position::Bottom),
                ]
                    .into_iter()
                    .map(|(name, p)| html! {
                        <option value={name} selected={p == current.position}>{name}</option>
                    }) }
            </select>
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct ReelProps {
    view: ReelView,
}

/// One strip; the browser tweens the offset with a linear transition.
#[function_component(Reel)]
fn reel(props: &ReelProps) -> Html {
    let style = format!(
        "background-position-y: {}px; transition: background-position-y {}ms {};",
        props.view.offset,
        props.view.duration_ms,
        props.view.easing.css()
    );
    html! { <div class="strip" {style}></div> }
}

#[wasm_bindgen(start)]
pub fn run() {
    yew::Renderer::<App>::new().render();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_timer_is_reported() {
        let mut view = View::default();
        view.note_timer(Ok(()), "Left reel");
        assert_eq!(view.error, None);
        view.note_timer(Err("no window to schedule timers on".into()), "Left reel");
        assert_eq!(
            view.error.as_deref(),
            Some("Left reel timer not scheduled: no window to schedule timers on")
        );
    }

    #[test]
    fn prize_style_uses_pulse_easing() {
        let style = prize_style(&PrizePulse::default());
        assert!(style.contains("--float-px: -200px;"));
        assert!(style.ends_with(&format!("--ease: {};", Easing::Power1.css())));
    }
}
