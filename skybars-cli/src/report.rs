use skybars_core::{DisplayModel, PLACEHOLDER, Status, Surface, layout};

/// Widest text bar, reached by a bar spanning the whole surface height.
const BAR_CHARS: f64 = 40.0;

/// Plain-text rendition of the bars for one-shot output.
pub fn render(model: &DisplayModel, surface: Surface) -> String {
    let mut out = String::new();

    let title = model
        .title()
        .map(str::to_uppercase)
        .unwrap_or_else(|| PLACEHOLDER.to_string());
    let zone = model
        .zone()
        .map(|z| z.label.as_str())
        .unwrap_or(PLACEHOLDER);
    out.push_str(&format!("{title}  ({zone}, °{})\n", model.scale().symbol()));

    for bar in layout::bars(model, surface) {
        let len = (bar.rect.height / surface.height * BAR_CHARS).round() as usize;
        out.push_str(&format!(
            "{:<12} {:>5}  {}\n",
            bar.name.text,
            bar.value.text,
            "█".repeat(len)
        ));
    }

    if let Status::Failed(msg) = model.status() {
        out.push_str(&format!("! {msg}\n"));
    }

    out
}
