use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::api::{self, DEFAULT_CATEGORY};
use crate::model::{DashboardAction, DashboardState};
use crate::util::clog;

use super::legend::Legend;
use super::nav::{HomeLink, Tile};
use super::side_nav::SideNav;
use super::treemap_view::TreemapView;

#[derive(PartialEq, Clone, Copy)]
enum Page {
    Index,
    Finance,
}

/// The same bundle is loaded by every page; the path decides which
/// chrome to show around the dashboard.
fn current_page() -> Page {
    let path = web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_default();
    if path.contains("finance.html") {
        Page::Finance
    } else {
        Page::Index
    }
}

#[function_component(App)]
pub fn app() -> Html {
    let state = use_reducer(|| DashboardState::new(DEFAULT_CATEGORY));
    let next_seq = use_mut_ref(|| 0u64);
    let page = current_page();

    let load_category = {
        let state = state.clone();
        let next_seq = next_seq.clone();
        Callback::from(move |category: String| {
            let seq = {
                let mut n = next_seq.borrow_mut();
                *n += 1;
                *n
            };
            state.dispatch(DashboardAction::FetchStarted {
                seq,
                category: category.clone(),
            });
            let state = state.clone();
            spawn_local(async move {
                match api::fetch_dataset(&category).await {
                    Ok(parsed) => {
                        if parsed.skipped > 0 {
                            clog(&format!(
                                "{category}: dropped {} rows with invalid values",
                                parsed.skipped
                            ));
                        }
                        state.dispatch(DashboardAction::FetchSucceeded { seq, parsed });
                    }
                    Err(message) => {
                        clog(&format!("{category}: {message}"));
                        state.dispatch(DashboardAction::FetchFailed { seq, message });
                    }
                }
            });
        })
    };

    // Load the default dataset once on mount.
    {
        let load_category = load_category.clone();
        use_effect_with((), move |_| {
            load_category.emit(DEFAULT_CATEGORY.to_string());
            || ()
        });
    }

    let legend_entries: Vec<(String, usize)> = state
        .groups
        .iter()
        .map(|g| (g.name.clone(), g.palette_index))
        .collect();

    let status = if state.loading {
        html! { <div style="opacity:0.7; margin-bottom:8px;">{ "Loading…" }</div> }
    } else if let Some(err) = &state.error {
        html! { <div style="color:#f85149; margin-bottom:8px;">{ format!("Failed to load data: {err}") }</div> }
    } else if state.skipped_rows > 0 {
        html! {
            <div style="color:#f0883e; font-size:12px; margin-bottom:8px;">
                { format!("{} rows skipped (invalid value)", state.skipped_rows) }
            </div>
        }
    } else {
        html! {}
    };

    html! {
        <div id="root" style="font-family:sans-serif; color:#e6edf3; background:#0e1116; min-height:100vh; padding:16px;">
            <div style="display:flex; align-items:center; justify-content:space-between; margin-bottom:16px;">
                <h1 style="margin:0; font-size:22px;">{ "Household Finance" }</h1>
                {
                    match page {
                        Page::Index => html! {
                            <div style="display:flex; gap:12px;">
                                <Tile label="Finance" target="finance" />
                            </div>
                        },
                        Page::Finance => html! { <HomeLink /> },
                    }
                }
            </div>
            <div style="display:flex; gap:24px; align-items:flex-start;">
                <SideNav active={state.active_category.clone()} on_select={load_category.clone()} />
                <div>
                    { status }
                    <TreemapView state={state.clone()} />
                </div>
                <Legend entries={legend_entries} />
            </div>
        </div>
    }
}
