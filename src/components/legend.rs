use yew::prelude::*;

use crate::palette::color_for;

#[derive(Properties, PartialEq, Clone)]
pub struct LegendProps {
    /// (category name, palette index) per group, in display order.
    pub entries: Vec<(String, usize)>,
}

#[function_component(Legend)]
pub fn legend(props: &LegendProps) -> Html {
    if props.entries.is_empty() {
        return html! {};
    }
    html! {
        <div style="background:rgba(22,27,34,0.9); border:1px solid #30363d; border-radius:8px; padding:8px; min-width:140px;">
            <div style="font-weight:600; margin-bottom:6px;">{ "Categories" }</div>
            { for props.entries.iter().map(|(name, idx)| html! {
                <LegendRow color={color_for(*idx)} label={name.clone()} />
            }) }
        </div>
    }
}

#[derive(Properties, PartialEq, Clone)]
struct LegendRowProps {
    pub color: &'static str,
    pub label: String,
}

#[function_component(LegendRow)]
fn legend_row(props: &LegendRowProps) -> Html {
    html! {
        <div style="display:flex; align-items:center; gap:8px; margin:3px 0;">
            <span style={format!("display:inline-block; width:12px; height:12px; background:{}; border:1px solid #30363d; border-radius:2px;", props.color)}></span>
            <span>{ props.label.clone() }</span>
        </div>
    }
}
