use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct TileProps {
    pub label: &'static str,
    /// Target page name without the `.html` extension.
    pub target: &'static str,
}

/// A clickable tile performing a full page navigation to `<target>.html`.
/// The target is not validated; a malformed one simply produces a
/// malformed URL for the browser to chew on.
#[function_component(Tile)]
pub fn tile(props: &TileProps) -> Html {
    let target = props.target;
    let onclick = Callback::from(move |_: MouseEvent| {
        if let Some(win) = web_sys::window() {
            let _ = win.location().set_href(&format!("{target}.html"));
        }
    });
    html! {
        <div class="tile" data-target={target} {onclick}
             style="cursor:pointer; background:rgba(22,27,34,0.9); border:1px solid #30363d; border-radius:8px; padding:12px 20px;">
            { props.label }
        </div>
    }
}

/// Home link shown on the finance page. The click handler navigates to
/// the same destination as the anchor's own default.
#[function_component(HomeLink)]
pub fn home_link() -> Html {
    let onclick = Callback::from(move |_: MouseEvent| {
        if let Some(win) = web_sys::window() {
            let _ = win.location().set_href("index.html");
        }
    });
    html! {
        <a href="index.html" {onclick} style="color:#58a6ff; text-decoration:none;">{ "Home" }</a>
    }
}
