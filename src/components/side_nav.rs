use yew::prelude::*;

/// (category id, display label) pairs backing the side navigation.
/// The id names the CSV file to fetch, `<id>_data.csv`.
pub const CATEGORIES: [(&str, &str); 3] = [
    ("income", "Income"),
    ("expenses", "Expenses"),
    ("savings", "Savings"),
];

#[derive(Properties, PartialEq, Clone)]
pub struct SideNavProps {
    pub active: String,
    pub on_select: Callback<String>,
}

/// Side navigation: one anchor per data category. Clicking suppresses
/// the anchor's default navigation and asks the dashboard to load that
/// category's dataset instead.
#[function_component(SideNav)]
pub fn side_nav(props: &SideNavProps) -> Html {
    html! {
        <nav class="side-nav"
             style="display:flex; flex-direction:column; gap:6px; min-width:120px; background:rgba(22,27,34,0.9); border:1px solid #30363d; border-radius:8px; padding:12px;">
            { for CATEGORIES.iter().map(|(id, label)| {
                let on_select = props.on_select.clone();
                let category = id.to_string();
                let onclick = Callback::from(move |e: MouseEvent| {
                    e.prevent_default();
                    on_select.emit(category.clone());
                });
                let weight = if props.active == *id { "font-weight:600;" } else { "" };
                html! {
                    <a href="#" data-category={*id} {onclick}
                       style={format!("color:#58a6ff; text-decoration:none; {weight}")}>
                        { *label }
                    </a>
                }
            }) }
        </nav>
    }
}
