//! DOM side of an embed: element lookup, banners, and the canvases.

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    CanvasRenderingContext2d, Document, HtmlAnchorElement, HtmlCanvasElement,
    HtmlElement, Window,
};

use crate::config::{AnimationConfig, Credits, SURFACE_HEIGHT, SURFACE_WIDTH};
use crate::error::{DweetError, DweetResult};
use crate::host::{Bounds, Page, RenderTarget};

fn host_err(what: &'static str) -> impl Fn(JsValue) -> DweetError {
    move |err| DweetError::host(format!("{what}: {err:?}"))
}

pub struct DomPage {
    window: Window,
    document: Document,
    source: String,
}

impl DomPage {
    pub fn new(source: String) -> DweetResult<Self> {
        let window = web_sys::window().ok_or_else(|| DweetError::host("no window"))?;
        let document = window.document().ok_or_else(|| DweetError::host("no document"))?;
        Ok(Self {
            window,
            document,
            source,
        })
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    fn create<T: JsCast>(&self, tag: &str) -> DweetResult<T> {
        self.document
            .create_element(tag)
            .map_err(host_err("create element"))?
            .dyn_into::<T>()
            .map_err(|_| DweetError::host(format!("<{tag}> has an unexpected type")))
    }

    /// Monospace banner used for the credits and the source listing.
    fn banner(&self) -> DweetResult<HtmlElement> {
        let div: HtmlElement = self.create("div")?;
        let style = div.style();
        for (property, value) in [
            ("width", "100%"),
            ("background-color", "black"),
            ("color", "white"),
            ("padding", "4px"),
            ("box-sizing", "border-box"),
            ("font-family", "monospace"),
            ("word-break", "break-all"),
        ] {
            style.set_property(property, value).map_err(host_err("style banner"))?;
        }
        Ok(div)
    }

    fn credits_banner(&self, credits: &Credits) -> DweetResult<HtmlElement> {
        let div = self.banner()?;
        let caption: HtmlElement = self.create("span")?;
        caption.set_inner_text(&credits.caption());
        div.append_child(&caption).map_err(host_err("append caption"))?;
        if let Some(link) = credits.link() {
            let anchor: HtmlAnchorElement = self.create("a")?;
            anchor.set_inner_text(link);
            anchor.set_href(link);
            anchor
                .style()
                .set_property("color", "#aaaaaa")
                .map_err(host_err("style link"))?;
            div.append_child(&anchor).map_err(host_err("append link"))?;
        }
        let closing: HtmlElement = self.create("span")?;
        closing.set_inner_text(Credits::CLOSING);
        div.append_child(&closing).map_err(host_err("append caption"))?;
        Ok(div)
    }

    fn canvas(&self, width: u32, height: u32) -> DweetResult<(HtmlCanvasElement, CanvasRenderingContext2d)> {
        let canvas: HtmlCanvasElement = self.create("canvas")?;
        canvas.set_width(width);
        canvas.set_height(height);
        let context = canvas
            .get_context("2d")
            .map_err(host_err("get 2d context"))?
            .ok_or_else(|| DweetError::host("2d canvas not supported"))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| DweetError::host("2d context has an unexpected type"))?;
        Ok((canvas, context))
    }

    /// 16:9 box that hides any overflow of the canvas inside it.
    fn aspect_container(&self) -> DweetResult<HtmlElement> {
        let div: HtmlElement = self.create("div")?;
        let style = div.style();
        for (property, value) in [
            ("width", "100%"),
            ("height", "0"),
            ("padding-bottom", "56.25%"),
            ("overflow", "hidden"),
        ] {
            style.set_property(property, value).map_err(host_err("style container"))?;
        }
        Ok(div)
    }
}

impl Page for DomPage {
    type Target = DomTarget;

    fn mount(&self, target_id: &str, config: &AnimationConfig) -> DweetResult<DomTarget> {
        let element = self
            .document
            .get_element_by_id(target_id)
            .ok_or_else(|| DweetError::target_not_found(target_id))?;

        if let Some(credits) = &config.credits {
            element
                .append_child(&self.credits_banner(credits)?)
                .map_err(host_err("append credits"))?;
        }

        let (canvas, context) = self.canvas(SURFACE_WIDTH, SURFACE_HEIGHT)?;
        let container = self.aspect_container()?;
        let display = if config.display_canvas {
            let width = (element.client_width().max(1)) as u32;
            let height = (f64::from(width) * f64::from(SURFACE_HEIGHT) / f64::from(SURFACE_WIDTH))
                .round()
                .max(1.0) as u32;
            let (display, display_context) = self.canvas(width, height)?;
            style_fill_width(&display)?;
            container.append_child(&display).map_err(host_err("append canvas"))?;
            Some((display, display_context))
        } else {
            style_fill_width(&canvas)?;
            container.append_child(&canvas).map_err(host_err("append canvas"))?;
            None
        };
        element.append_child(&container).map_err(host_err("append container"))?;

        if config.show_source {
            let listing = self.banner()?;
            listing.set_inner_text(&self.source);
            element.append_child(&listing).map_err(host_err("append source"))?;
        }

        Ok(DomTarget {
            window: self.window.clone(),
            canvas,
            context,
            display,
        })
    }
}

fn style_fill_width(canvas: &HtmlCanvasElement) -> DweetResult<()> {
    canvas
        .style()
        .set_property("width", "100%")
        .map_err(host_err("style canvas"))
}

pub struct DomTarget {
    window: Window,
    canvas: HtmlCanvasElement,
    context: CanvasRenderingContext2d,
    display: Option<(HtmlCanvasElement, CanvasRenderingContext2d)>,
}

impl DomTarget {
    /// The canvas actually shown on the page.
    fn shown(&self) -> &HtmlCanvasElement {
        match &self.display {
            Some((display, _)) => display,
            None => &self.canvas,
        }
    }
}

impl RenderTarget for DomTarget {
    type Canvas = HtmlCanvasElement;
    type Context = CanvasRenderingContext2d;

    fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    fn context(&self) -> &CanvasRenderingContext2d {
        &self.context
    }

    fn is_visible(&self) -> bool {
        let rect = self.shown().get_bounding_client_rect();
        let extent = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64());
        match (extent(self.window.inner_width()), extent(self.window.inner_height())) {
            (Some(width), Some(height)) => Bounds {
                left: rect.left(),
                right: rect.right(),
                top: rect.top(),
                bottom: rect.bottom(),
            }
            .intersects_viewport(width, height),
            // Unknown viewport: keep animating.
            _ => true,
        }
    }

    fn present(&mut self) -> DweetResult<()> {
        let Some((display, context)) = &self.display else {
            return Ok(());
        };
        context.clear_rect(0.0, 0.0, f64::from(display.width()), f64::from(display.height()));
        context.save();
        context
            .scale(
                f64::from(display.width()) / f64::from(self.canvas.width()),
                f64::from(display.height()) / f64::from(self.canvas.height()),
            )
            .map_err(host_err("scale display"))?;
        let drawn = context.draw_image_with_html_canvas_element(&self.canvas, 0.0, 0.0);
        context.restore();
        drawn.map_err(host_err("composite display"))
    }
}
