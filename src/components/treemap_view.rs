use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};
use yew::prelude::*;

use crate::layout::{LeafBox, layout_groups, leaf_at};
use crate::model::DashboardState;
use crate::palette::color_for;
use crate::util::format_currency;

/// Logical surface size; the treemap itself is laid out inside a margin
/// on all sides.
const SURFACE_WIDTH: f64 = 600.0;
const SURFACE_HEIGHT: f64 = 400.0;
const MARGIN: f64 = 10.0;
/// Separation between sibling rectangles at both hierarchy levels.
const PADDING: f64 = 2.0;
/// Label offset from a rectangle's top-left corner.
const LABEL_OFFSET_X: f64 = 5.0;
const LABEL_OFFSET_Y: f64 = 20.0;
/// Tooltip offset from the pointer.
const TOOLTIP_DX: i32 = 10;
const TOOLTIP_DY: i32 = -28;

/// Payload for the hovered leaf rectangle.
#[derive(Clone, PartialEq)]
struct Hover {
    category: String,
    subcategory: String,
    value: f64,
    client_x: i32,
    client_y: i32,
}

#[derive(Properties, PartialEq, Clone)]
pub struct TreemapViewProps {
    pub state: UseReducerHandle<DashboardState>,
}

#[function_component(TreemapView)]
pub fn treemap_view(props: &TreemapViewProps) -> Html {
    let canvas_ref = use_node_ref();
    let leaves = use_mut_ref(Vec::<LeafBox>::new);
    let draw_ref = use_mut_ref(|| None::<Rc<dyn Fn()>>);
    let hover = use_state(|| None::<Hover>);

    // Recompute the layout and redraw whenever a new dataset is applied.
    {
        let leaves = leaves.clone();
        let draw_ref = draw_ref.clone();
        let state = props.state.clone();
        let version = props.state.version;
        use_effect_with(version, move |_| {
            *leaves.borrow_mut() = layout_groups(
                &state.groups,
                SURFACE_WIDTH - 2.0 * MARGIN,
                SURFACE_HEIGHT - 2.0 * MARGIN,
                PADDING,
            );
            if let Some(f) = &*draw_ref.borrow() {
                f();
            }
            || ()
        });
    }

    {
        let canvas_ref = canvas_ref.clone();
        let leaves_setup = leaves.clone();
        let draw_ref_setup = draw_ref.clone();
        let hover_setup = hover.clone();
        use_effect_with((), move |_| {
            let canvas: HtmlCanvasElement = canvas_ref
                .cast::<HtmlCanvasElement>()
                .expect("canvas_ref not attached to a canvas element");
            canvas.set_width(SURFACE_WIDTH as u32);
            canvas.set_height(SURFACE_HEIGHT as u32);

            // Build draw closure and store it for the layout effect.
            let draw_closure: Rc<dyn Fn()> = {
                let canvas = canvas.clone();
                let leaves = leaves_setup.clone();
                Rc::new(move || {
                    if !canvas.is_connected() {
                        return;
                    }
                    let ctx = match canvas.get_context("2d").ok().flatten() {
                        Some(c) => match c.dyn_into::<CanvasRenderingContext2d>() {
                            Ok(c) => c,
                            Err(_) => return,
                        },
                        None => return,
                    };
                    // Wipe the previous dataset's rectangles and labels.
                    ctx.set_fill_style_str("#0e1116");
                    ctx.fill_rect(0.0, 0.0, SURFACE_WIDTH, SURFACE_HEIGHT);
                    ctx.set_line_width(1.0);
                    ctx.set_font("12px sans-serif");
                    for leaf in leaves.borrow().iter() {
                        let r = leaf.rect;
                        if r.w <= 0.0 || r.h <= 0.0 {
                            continue;
                        }
                        ctx.set_fill_style_str(color_for(leaf.palette_index));
                        ctx.fill_rect(MARGIN + r.x, MARGIN + r.y, r.w, r.h);
                        ctx.set_stroke_style_str("black");
                        ctx.stroke_rect(MARGIN + r.x, MARGIN + r.y, r.w, r.h);
                        // Labels are never wrapped or clipped; long names spill over.
                        ctx.set_fill_style_str("white");
                        ctx.fill_text(
                            &leaf.subcategory,
                            MARGIN + r.x + LABEL_OFFSET_X,
                            MARGIN + r.y + LABEL_OFFSET_Y,
                        )
                        .ok();
                    }
                })
            };
            *draw_ref_setup.borrow_mut() = Some(draw_closure.clone());

            // Initial draw
            (draw_closure)();

            // Hover: hit-test the pointer against the laid-out leaves.
            let mousemove_cb = {
                let leaves = leaves_setup.clone();
                let hover = hover_setup.clone();
                Closure::wrap(Box::new(move |e: web_sys::MouseEvent| {
                    let x = e.offset_x() as f64 - MARGIN;
                    let y = e.offset_y() as f64 - MARGIN;
                    let hit = leaf_at(&leaves.borrow(), x, y).map(|leaf| Hover {
                        category: leaf.category.clone(),
                        subcategory: leaf.subcategory.clone(),
                        value: leaf.value,
                        client_x: e.client_x(),
                        client_y: e.client_y(),
                    });
                    hover.set(hit);
                }) as Box<dyn FnMut(_)>)
            };
            canvas
                .add_event_listener_with_callback("mousemove", mousemove_cb.as_ref().unchecked_ref())
                .unwrap();

            // Hiding needs no per-event data.
            let mouseleave_cb = {
                let hover = hover_setup.clone();
                Closure::wrap(Box::new(move |_e: web_sys::MouseEvent| {
                    hover.set(None);
                }) as Box<dyn FnMut(_)>)
            };
            canvas
                .add_event_listener_with_callback(
                    "mouseleave",
                    mouseleave_cb.as_ref().unchecked_ref(),
                )
                .unwrap();

            let canvas_cleanup = canvas.clone();
            move || {
                let _ = canvas_cleanup.remove_event_listener_with_callback(
                    "mousemove",
                    mousemove_cb.as_ref().unchecked_ref(),
                );
                let _ = canvas_cleanup.remove_event_listener_with_callback(
                    "mouseleave",
                    mouseleave_cb.as_ref().unchecked_ref(),
                );
            }
        });
    }

    // One tooltip element for the component's whole lifetime; hover only
    // toggles opacity and repositions it near the pointer.
    let tooltip_style = match &*hover {
        Some(hv) => format!(
            "position:fixed; left:{}px; top:{}px; opacity:1; background-color:white; color:#111; \
             border:solid 1px; border-radius:5px; padding:10px; pointer-events:none; \
             white-space:pre; font-size:12px;",
            hv.client_x + TOOLTIP_DX,
            hv.client_y + TOOLTIP_DY
        ),
        None => "position:fixed; left:0; top:0; opacity:0; pointer-events:none;".to_string(),
    };
    let tooltip_text = hover
        .as_ref()
        .map(|hv| {
            format!(
                "Category: {}\nSubcategory: {}\nValue: {}",
                hv.category,
                hv.subcategory,
                format_currency(hv.value)
            )
        })
        .unwrap_or_default();

    html! {
        <div class="treemap-container" style="position:relative;">
            <canvas ref={canvas_ref.clone()} style="display:block;"></canvas>
            <div class="tooltip" style={tooltip_style}>{ tooltip_text }</div>
        </div>
    }
}
