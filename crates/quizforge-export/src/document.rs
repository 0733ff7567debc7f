//! Standalone document synthesis.
//!
//! Wraps a body fragment into a complete HTML document with the theme
//! palettes, layout CSS, theme selector and behavior script inlined. The
//! output depends only on its inputs, so the same quiz always exports to
//! the same bytes.

use quizforge_core::settings::{FontFamily, Settings, MAX_FONT_SIZE, MIN_FONT_SIZE};
use quizforge_core::theme::ThemeId;

use crate::escape::{escape, escape_json_for_script};
use crate::script::BEHAVIOR_SCRIPT;

/// Presentation choices baked into an exported document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportOptions {
    /// Theme the document opens with until the reader picks another.
    pub initial_theme: ThemeId,
    pub font_family: FontFamily,
    /// Base font size in pixels.
    pub font_size: u32,
    /// Sets `data-contrast="high"` on the root element.
    pub high_contrast: bool,
    /// Sets `data-motion="reduce"` on the root element.
    pub reduce_motion: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            initial_theme: ThemeId::default(),
            font_family: FontFamily::default(),
            font_size: 16,
            high_contrast: false,
            reduce_motion: false,
        }
    }
}

impl From<&Settings> for ExportOptions {
    fn from(settings: &Settings) -> Self {
        Self {
            initial_theme: settings.theme,
            font_family: settings.font_family,
            font_size: settings.font_size.clamp(MIN_FONT_SIZE, MAX_FONT_SIZE),
            high_contrast: settings.high_contrast,
            reduce_motion: settings.reduce_motion,
        }
    }
}

/// Assemble a full document.
///
/// `data_json` is the serialized data island; it is omitted entirely when
/// `None`, which leaves the grading half of the script inert.
pub fn synthesize(
    title: &str,
    body: &str,
    data_json: Option<&str>,
    options: &ExportOptions,
) -> String {
    let mut html = String::with_capacity(body.len() + BEHAVIOR_SCRIPT.len() + 8 * 1024);

    html.push_str("<!DOCTYPE html>\n");
    html.push_str(&format!(
        "<html lang=\"en\" data-theme=\"{}\"",
        options.initial_theme.as_str()
    ));
    if options.high_contrast {
        html.push_str(" data-contrast=\"high\"");
    }
    if options.reduce_motion {
        html.push_str(" data-motion=\"reduce\"");
    }
    html.push_str(">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!("<title>{}</title>\n", escape(title)));
    html.push_str("<style>\n");
    html.push_str(&theme_css());
    html.push_str(&format!(
        "body {{ font-family: {}; font-size: {}px; }}\n",
        options.font_family.css(),
        options.font_size
    ));
    html.push_str(LAYOUT_CSS);
    html.push_str(ACCESSIBILITY_CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");

    html.push_str(&theme_selector(options.initial_theme));

    html.push_str("<div class=\"container\">\n");
    html.push_str(body);
    if !body.is_empty() && !body.ends_with('\n') {
        html.push('\n');
    }
    html.push_str("</div>\n");

    if let Some(json) = data_json {
        html.push_str("<script id=\"quiz-data\" type=\"application/json\">");
        html.push_str(&escape_json_for_script(json));
        html.push_str("</script>\n");
    }

    html.push_str("<script>");
    html.push_str(BEHAVIOR_SCRIPT);
    html.push_str("</script>\n");

    html.push_str("</body>\n</html>\n");
    html
}

/// One custom-property block per theme. The default theme also claims
/// `:root` so the page is styled before any attribute is applied.
fn theme_css() -> String {
    let mut css = String::new();
    for theme in ThemeId::ALL {
        if theme == ThemeId::default() {
            css.push_str(&format!(
                ":root, html[data-theme='{}'] {{\n",
                theme.as_str()
            ));
        } else {
            css.push_str(&format!("html[data-theme='{}'] {{\n", theme.as_str()));
        }
        for (name, value) in theme.palette().tokens() {
            css.push_str(&format!("  --{name}: {value};\n"));
        }
        css.push_str("}\n");
    }
    css
}

fn theme_selector(initial: ThemeId) -> String {
    let mut html = String::new();
    html.push_str("<div class=\"theme-switcher\">\n");
    html.push_str("<select id=\"themeSelector\" aria-label=\"Theme\">\n");
    for theme in ThemeId::ALL {
        let selected = if theme == initial { " selected" } else { "" };
        html.push_str(&format!(
            "<option value=\"{}\"{selected}>{}</option>\n",
            theme.as_str(),
            theme.label()
        ));
    }
    html.push_str("</select>\n</div>\n");
    html
}

const LAYOUT_CSS: &str = r#"
body { line-height: 1.6; color: var(--text-primary); background-color: var(--bg-primary); max-width: 800px; margin: 20px auto; padding: 20px; transition: background-color 0.3s, color 0.3s; overflow-wrap: break-word; }
.container { background-color: var(--bg-secondary); border: 1px solid var(--border-color); border-radius: 8px; padding: 2rem; }
h1, h2, h3 { color: var(--text-primary); overflow-wrap: break-word; }
h1 { border-bottom: 2px solid var(--accent); padding-bottom: 10px; }
.question { margin-bottom: 2rem; border-left: 4px solid var(--accent); padding-left: 1rem; }
.question .type { font-size: 0.8em; color: var(--text-secondary); }
.options { list-style: none; padding: 0; }
.option { display: flex; align-items: flex-start; gap: 10px; margin-bottom: 0.5rem; padding: 10px; border-radius: 4px; border: 1px solid var(--border-color); cursor: pointer; transition: border-color 0.2s; }
.option:hover { border-color: var(--accent); }
.option input { margin-top: 5px; flex-shrink: 0; }
.option .body { flex-grow: 1; }
.option .marker { font-weight: bold; min-width: 1em; }
.option.correct { background-color: var(--correct-bg); color: var(--correct-text); border-color: var(--correct-text); }
.option.incorrect { background-color: var(--incorrect-bg); color: var(--incorrect-text); border-color: var(--incorrect-text); }
.option.user-choice { box-shadow: 0 0 0 2px var(--accent); }
.option.static { cursor: default; }
.explanation { font-style: italic; color: var(--text-secondary); margin-top: 0.5rem; border-left: 2px solid var(--border-color); padding-left: 10px; font-size: 0.9em; display: none; }
.explanation.visible { display: block; }
.score { font-size: 1.5em; font-weight: bold; color: var(--accent); }
.actions { text-align: center; margin-top: 2rem; }
.button { background-color: var(--accent); color: var(--bg-secondary); border: none; padding: 12px 24px; font-size: 1em; font-weight: bold; border-radius: 6px; cursor: pointer; transition: opacity 0.2s; }
.button:hover { opacity: 0.9; }
.button.secondary { background-color: var(--bg-primary); color: var(--text-primary); border: 1px solid var(--border-color); }
.hidden { display: none; }
#results-summary { text-align: center; margin-bottom: 2rem; }
.theme-switcher { position: fixed; top: 15px; right: 20px; }
.theme-switcher select { background-color: var(--bg-secondary); color: var(--text-primary); border: 1px solid var(--border-color); padding: 5px 10px; border-radius: 5px; cursor: pointer; }
@media (prefers-reduced-motion: reduce) { * { transition: none !important; } }
"#;

// After the theme blocks so the overrides win for every theme.
const ACCESSIBILITY_CSS: &str = r#"html[data-contrast='high'] { --text-secondary: var(--text-primary); --border-color: var(--text-primary); }
html[data-contrast='high'] .option, html[data-contrast='high'] .container { border-width: 2px; }
html[data-contrast='high'] .explanation { font-style: normal; }
html[data-motion='reduce'] * { transition: none !important; animation: none !important; }
"#;
