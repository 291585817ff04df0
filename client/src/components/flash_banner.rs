//! Green/red flash message banner.
//!
//! Messages are cleared whenever the route changes, so a message only ever
//! describes the page it was raised on.

use leptos::prelude::*;
use leptos_router::hooks::use_location;

use crate::actions::clear_flash_messages;
use crate::state::flash::FlashState;

#[component]
pub fn FlashBanner() -> impl IntoView {
    let flash = expect_context::<RwSignal<FlashState>>();
    let location = use_location();

    Effect::watch(
        move || location.pathname.get(),
        move |_, _, _| clear_flash_messages(flash),
        false,
    );

    let green = move || flash.with(|f| f.green.clone());
    let red = move || flash.with(|f| f.red.clone());

    view! {
        <Show when=move || !flash.with(FlashState::is_empty)>
            <div class="flash">
                <Show when=move || !green().is_empty()>
                    <p class="flash__message flash__message--green" role="status">{green}</p>
                </Show>
                <Show when=move || !red().is_empty()>
                    <p class="flash__message flash__message--red" role="alert">{red}</p>
                </Show>
                <button class="flash__dismiss" type="button" on:click=move |_| clear_flash_messages(flash)>
                    "Dismiss"
                </button>
            </div>
        </Show>
    }
}
