//! Example: Basic usage of domx

use domx::{Config, Dom, Event, EventHandler, Query};
use tracing_subscriber::EnvFilter;

const PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><title>domx</title></head>
<body>
  <ul id="menu">
    <li class="item">Home</li>
    <li class="item">About</li>
  </ul>
</body>
</html>"#;

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut dom = Dom::parse(PAGE, Config::default())?;
    println!("domx v{} loaded {:?}", domx::VERSION, dom.document().title());

    dom.dispatch(Query::ready(|| println!("DOMContentLoaded")))?;

    let click = EventHandler::new(|event: &Event| {
        println!("clicked {:?}", event.target());
    });

    if let Some(mut items) = dom.dispatch("#menu .item")?.elements() {
        items
            .toggle_class("active")
            .on("click", &click)
            .append("<span> &raquo;</span>")?;
        println!("{} menu items", items.len());
    }

    let created = dom.dispatch("<li class=\"item\">Contact</li>")?.element().map(|el| el.id());
    if let (Some(li), Some(menu)) = (created, dom.document().get_element_by_id("menu")) {
        dom.element(menu)?.append(li)?;
    }

    dom.finish_loading();

    if let Some(first) = dom.document().query_selector("#menu .item")? {
        dom.document_mut().dispatch_event(first, &Event::bubbling("click"));
    }

    if let Some(body) = dom.body() {
        println!("{}", body.inner_html());
    }
    Ok(())
}
