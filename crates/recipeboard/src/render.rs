//! Rendering adapters for the recipe board.
//!
//! The board never formats output itself. After every state change it builds
//! a [`BoardFrame`] and hands it to a [`Renderer`]. Swapping the renderer
//! changes the presentation (plain text, HTML cards, JSON) without touching
//! board logic, and tests substitute a [`RecordingRenderer`].

use std::collections::BTreeMap;
use std::fmt;
use std::io::Write;
use std::str::FromStr;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::favorites::FavoritesSet;
use crate::recipe::{Difficulty, Recipe};

/// Which collapsible panel of a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    /// The preparation steps.
    Steps,
    /// The ingredient list.
    Ingredients,
}

impl SectionKind {
    /// Prefix used in section ids.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Steps => "steps",
            Self::Ingredients => "ingredients",
        }
    }

    const fn noun(self) -> &'static str {
        match self {
            Self::Steps => "Steps",
            Self::Ingredients => "Ingredients",
        }
    }
}

/// Identifies one panel on one card, written `steps-<id>` or `ingredients-<id>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct SectionId {
    /// The recipe the panel belongs to.
    pub recipe_id: u32,
    /// Which panel.
    pub kind: SectionKind,
}

impl SectionId {
    /// Steps panel of `recipe_id`.
    #[must_use]
    pub const fn steps(recipe_id: u32) -> Self {
        Self {
            recipe_id,
            kind: SectionKind::Steps,
        }
    }

    /// Ingredients panel of `recipe_id`.
    #[must_use]
    pub const fn ingredients(recipe_id: u32) -> Self {
        Self {
            recipe_id,
            kind: SectionKind::Ingredients,
        }
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.kind.as_str(), self.recipe_id)
    }
}

impl FromStr for SectionId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let (prefix, id) = s.rsplit_once('-').ok_or_else(|| Error::unknown_section(s))?;
        let kind = match prefix {
            "steps" => SectionKind::Steps,
            "ingredients" => SectionKind::Ingredients,
            _ => return Err(Error::unknown_section(s)),
        };
        let recipe_id = id.parse().map_err(|_| Error::unknown_section(s))?;
        Ok(Self { recipe_id, kind })
    }
}

/// Label of a panel's toggle control, e.g. "Show Steps" or "Hide Ingredients".
#[must_use]
pub fn toggle_label(kind: SectionKind, visible: bool) -> String {
    let verb = if visible { "Hide" } else { "Show" };
    format!("{verb} {}", kind.noun())
}

/// Text of the count label.
#[must_use]
pub fn count_label(shown: usize, total: usize) -> String {
    format!("Showing {shown} of {total} recipes")
}

/// A group of mutually exclusive controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlGroup {
    /// Filter buttons.
    Filters,
    /// Sort buttons.
    Sorts,
}

impl ControlGroup {
    /// Group name as shown to the user.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Filters => "filters",
            Self::Sorts => "sorts",
        }
    }
}

/// One recipe card as it should be displayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardView {
    /// Recipe id.
    pub id: u32,
    /// Title.
    pub title: String,
    /// Minutes.
    pub time: u32,
    /// Difficulty tag.
    pub difficulty: Difficulty,
    /// Description paragraph.
    pub description: String,
    /// Ingredients (hidden until toggled).
    pub ingredients: Vec<String>,
    /// Steps (hidden until toggled).
    pub steps: Vec<String>,
    /// Whether the favorite control is marked active.
    pub favorite: bool,
}

impl CardView {
    /// Build the card for `recipe`.
    #[must_use]
    pub fn new(recipe: &Recipe, favorites: &FavoritesSet) -> Self {
        Self {
            id: recipe.id,
            title: recipe.title.clone(),
            time: recipe.time,
            difficulty: recipe.difficulty,
            description: recipe.description.clone(),
            ingredients: recipe.ingredients.clone(),
            steps: recipe.steps.clone(),
            favorite: favorites.contains(recipe.id),
        }
    }

    /// Contents of one panel.
    #[must_use]
    pub fn section(&self, kind: SectionKind) -> &[String] {
        match kind {
            SectionKind::Steps => &self.steps,
            SectionKind::Ingredients => &self.ingredients,
        }
    }
}

/// Everything a renderer needs to redraw the board.
///
/// Each frame replaces the previous one entirely; all panels start hidden.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardFrame {
    /// Cards in display order.
    pub cards: Vec<CardView>,
    /// Number of recipes in the catalog.
    pub total: usize,
    /// Highlighted control per group.
    pub active_controls: BTreeMap<ControlGroup, String>,
}

impl BoardFrame {
    /// Text of the count label for this frame.
    #[must_use]
    pub fn count_label(&self) -> String {
        count_label(self.cards.len(), self.total)
    }

    /// Ids of the cards, in order.
    #[must_use]
    pub fn ids(&self) -> Vec<u32> {
        self.cards.iter().map(|c| c.id).collect()
    }

    /// Find the card for `recipe_id`.
    #[must_use]
    pub fn card(&self, recipe_id: u32) -> Option<&CardView> {
        self.cards.iter().find(|c| c.id == recipe_id)
    }
}

/// Presentation adapter for the board.
pub trait Renderer: fmt::Debug {
    /// Replace the displayed content with `frame`.
    ///
    /// # Errors
    ///
    /// Returns an error if output cannot be written.
    fn render(&mut self, frame: &BoardFrame) -> Result<()>;

    /// A panel on `card` was shown or hidden.
    ///
    /// # Errors
    ///
    /// Returns an error if output cannot be written.
    fn section_toggled(&mut self, card: &CardView, kind: SectionKind, visible: bool)
        -> Result<()>;
}

/// Plain-text renderer for terminals.
#[derive(Debug)]
pub struct TextRenderer<W> {
    out: W,
}

impl<W: Write> TextRenderer<W> {
    /// Render into `out`.
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Consume the renderer, returning the writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + fmt::Debug> Renderer for TextRenderer<W> {
    fn render(&mut self, frame: &BoardFrame) -> Result<()> {
        for card in &frame.cards {
            let heart = if card.favorite { " ♥" } else { "" };
            writeln!(self.out, "[{}] {}{heart}", card.id, card.title)?;
            writeln!(self.out, "    {} min · {}", card.time, card.difficulty)?;
            writeln!(self.out, "    {}", card.description)?;
            writeln!(
                self.out,
                "    [{}] [{}]",
                toggle_label(SectionKind::Steps, false),
                toggle_label(SectionKind::Ingredients, false)
            )?;
            writeln!(self.out)?;
        }

        let controls: Vec<String> = frame
            .active_controls
            .iter()
            .map(|(group, control)| format!("{}: {control}", group.as_str()))
            .collect();
        if controls.is_empty() {
            writeln!(self.out, "{}", frame.count_label())?;
        } else {
            writeln!(self.out, "{} ({})", frame.count_label(), controls.join(", "))?;
        }
        self.out.flush()?;
        Ok(())
    }

    fn section_toggled(
        &mut self,
        card: &CardView,
        kind: SectionKind,
        visible: bool,
    ) -> Result<()> {
        writeln!(
            self.out,
            "[{}] {} [{}]",
            card.id,
            card.title,
            toggle_label(kind, visible)
        )?;
        if visible {
            for (i, item) in card.section(kind).iter().enumerate() {
                match kind {
                    SectionKind::Steps => writeln!(self.out, "    {}. {item}", i + 1)?,
                    SectionKind::Ingredients => writeln!(self.out, "    - {item}")?,
                }
            }
        }
        self.out.flush()?;
        Ok(())
    }
}

/// Renders recipe cards as HTML markup.
#[derive(Debug)]
pub struct HtmlRenderer<W> {
    out: W,
}

impl<W: Write> HtmlRenderer<W> {
    /// Render into `out`.
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Consume the renderer, returning the writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

/// Markup for a single recipe card.
#[must_use]
pub fn card_html(card: &CardView) -> String {
    use html_escape::{encode_double_quoted_attribute as attr, encode_text as text};

    let list = |items: &[String]| {
        let lis: String = items
            .iter()
            .map(|i| format!("<li>{}</li>", text(i)))
            .collect();
        format!("<ul>{lis}</ul>")
    };
    let difficulty = card.difficulty.as_str();
    let active = if card.favorite { " active" } else { "" };
    let id = card.id;

    format!(
        r#"<div class="recipe-card" data-id="{id}">
  <h3>{title}</h3>
  <div class="recipe-meta">
    <span>⏱️ {time} min</span>
    <span class="difficulty {difficulty}">{difficulty}</span>
  </div>
  <p>{description}</p>
  <button class="toggle-btn" data-target="{steps_id}">{steps_label}</button>
  <div id="{steps_id}" class="steps hidden">{steps}</div>
  <button class="toggle-btn" data-target="{ingredients_id}">{ingredients_label}</button>
  <div id="{ingredients_id}" class="ingredients hidden">{ingredients}</div>
  <button class="favorite-btn{active}" data-id="{id}">❤️</button>
</div>
"#,
        title = text(&card.title),
        time = card.time,
        description = text(&card.description),
        steps_id = attr(&SectionId::steps(id).to_string()),
        steps_label = toggle_label(SectionKind::Steps, false),
        steps = list(&card.steps),
        ingredients_id = attr(&SectionId::ingredients(id).to_string()),
        ingredients_label = toggle_label(SectionKind::Ingredients, false),
        ingredients = list(&card.ingredients),
    )
}

impl<W: Write + fmt::Debug> Renderer for HtmlRenderer<W> {
    fn render(&mut self, frame: &BoardFrame) -> Result<()> {
        writeln!(self.out, r#"<div id="recipe-container">"#)?;
        for card in &frame.cards {
            self.out.write_all(card_html(card).as_bytes())?;
        }
        writeln!(self.out, "</div>")?;
        writeln!(
            self.out,
            r#"<p id="recipe-counter">{}</p>"#,
            html_escape::encode_text(&frame.count_label())
        )?;
        self.out.flush()?;
        Ok(())
    }

    fn section_toggled(
        &mut self,
        card: &CardView,
        kind: SectionKind,
        visible: bool,
    ) -> Result<()> {
        let section = SectionId {
            recipe_id: card.id,
            kind,
        };
        let hidden = if visible { "" } else { " hidden" };
        let items: String = card
            .section(kind)
            .iter()
            .map(|i| format!("<li>{}</li>", html_escape::encode_text(i)))
            .collect();
        writeln!(
            self.out,
            r#"<button class="toggle-btn" data-target="{section}">{}</button>"#,
            toggle_label(kind, visible)
        )?;
        writeln!(
            self.out,
            r#"<div id="{section}" class="{}{hidden}"><ul>{items}</ul></div>"#,
            kind.as_str()
        )?;
        self.out.flush()?;
        Ok(())
    }
}

/// Writes each frame as one line of JSON.
#[derive(Debug)]
pub struct JsonRenderer<W> {
    out: W,
}

impl<W: Write> JsonRenderer<W> {
    /// Render into `out`.
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write + fmt::Debug> Renderer for JsonRenderer<W> {
    fn render(&mut self, frame: &BoardFrame) -> Result<()> {
        let value = serde_json::json!({
            "recipes": frame.cards,
            "shown": frame.cards.len(),
            "total": frame.total,
            "label": frame.count_label(),
            "active_controls": frame.active_controls,
        });
        serde_json::to_writer(&mut self.out, &value)?;
        writeln!(self.out)?;
        self.out.flush()?;
        Ok(())
    }

    fn section_toggled(
        &mut self,
        card: &CardView,
        kind: SectionKind,
        visible: bool,
    ) -> Result<()> {
        let value = serde_json::json!({
            "section": SectionId { recipe_id: card.id, kind }.to_string(),
            "visible": visible,
            "label": toggle_label(kind, visible),
            "items": card.section(kind),
        });
        serde_json::to_writer(&mut self.out, &value)?;
        writeln!(self.out)?;
        Ok(())
    }
}

/// A section toggle seen by a [`RecordingRenderer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionEvent {
    /// The panel.
    pub section: SectionId,
    /// Visible afterwards.
    pub visible: bool,
    /// Control label afterwards.
    pub label: String,
}

/// Keeps every frame and section event instead of drawing them.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    /// Frames in the order they were rendered.
    pub frames: Vec<BoardFrame>,
    /// Section toggles in order.
    pub sections: Vec<SectionEvent>,
}

impl RecordingRenderer {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recent frame.
    #[must_use]
    pub fn last(&self) -> Option<&BoardFrame> {
        self.frames.last()
    }
}

impl Renderer for RecordingRenderer {
    fn render(&mut self, frame: &BoardFrame) -> Result<()> {
        self.frames.push(frame.clone());
        Ok(())
    }

    fn section_toggled(
        &mut self,
        card: &CardView,
        kind: SectionKind,
        visible: bool,
    ) -> Result<()> {
        self.sections.push(SectionEvent {
            section: SectionId {
                recipe_id: card.id,
                kind,
            },
            visible,
            label: toggle_label(kind, visible),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipe::Catalog;

    fn frame(favorites: &FavoritesSet) -> BoardFrame {
        let catalog = Catalog::builtin();
        BoardFrame {
            cards: catalog
                .recipes()
                .iter()
                .map(|r| CardView::new(r, favorites))
                .collect(),
            total: catalog.len(),
            active_controls: BTreeMap::new(),
        }
    }

    #[test]
    fn test_section_id_display() {
        assert_eq!(SectionId::steps(1).to_string(), "steps-1");
        assert_eq!(SectionId::ingredients(12).to_string(), "ingredients-12");
    }

    #[test]
    fn test_section_id_parse() {
        assert_eq!("steps-3".parse::<SectionId>().unwrap(), SectionId::steps(3));
        assert_eq!(
            " ingredients-2 ".parse::<SectionId>().unwrap(),
            SectionId::ingredients(2)
        );
        assert!("notes-1".parse::<SectionId>().is_err());
        assert!("steps-x".parse::<SectionId>().is_err());
        assert!("steps".parse::<SectionId>().is_err());
    }

    #[test]
    fn test_toggle_label() {
        assert_eq!(toggle_label(SectionKind::Steps, false), "Show Steps");
        assert_eq!(toggle_label(SectionKind::Steps, true), "Hide Steps");
        assert_eq!(toggle_label(SectionKind::Ingredients, true), "Hide Ingredients");
    }

    #[test]
    fn test_count_label() {
        assert_eq!(count_label(1, 3), "Showing 1 of 3 recipes");
        assert_eq!(count_label(0, 3), "Showing 0 of 3 recipes");
    }

    #[test]
    fn test_card_view_marks_favorite() {
        let favorites: FavoritesSet = [2].into_iter().collect();
        let frame = frame(&favorites);
        assert!(!frame.card(1).unwrap().favorite);
        assert!(frame.card(2).unwrap().favorite);
    }

    #[test]
    fn test_text_renderer_output() {
        let favorites: FavoritesSet = [3].into_iter().collect();
        let mut renderer = TextRenderer::new(Vec::new());
        renderer.render(&frame(&favorites)).unwrap();

        let out = String::from_utf8(renderer.into_inner()).unwrap();
        assert!(out.contains("[1] 🍝 Classic Spaghetti Carbonara\n"));
        assert!(out.contains("[3] 🥗 Greek Salad ♥"));
        assert!(out.contains("25 min · easy"));
        assert!(out.contains("[Show Steps] [Show Ingredients]"));
        assert!(out.ends_with("Showing 3 of 3 recipes\n"));
    }

    #[test]
    fn test_text_renderer_shows_active_controls() {
        let mut f = frame(&FavoritesSet::new());
        f.active_controls
            .insert(ControlGroup::Filters, "easy".to_string());
        let mut renderer = TextRenderer::new(Vec::new());
        renderer.render(&f).unwrap();

        let out = String::from_utf8(renderer.into_inner()).unwrap();
        assert!(out.contains("Showing 3 of 3 recipes (filters: easy)"));
    }

    #[test]
    fn test_text_renderer_section_toggle() {
        let f = frame(&FavoritesSet::new());
        let card = f.card(1).unwrap();
        let mut renderer = TextRenderer::new(Vec::new());
        renderer
            .section_toggled(card, SectionKind::Steps, true)
            .unwrap();
        renderer
            .section_toggled(card, SectionKind::Steps, false)
            .unwrap();

        let out = String::from_utf8(renderer.into_inner()).unwrap();
        assert!(out.contains("[Hide Steps]"));
        assert!(out.contains("    1. Boil pasta"));
        assert!(out.contains("[Show Steps]"));
    }

    #[test]
    fn test_card_html() {
        let favorites: FavoritesSet = [1].into_iter().collect();
        let f = frame(&favorites);
        let html = card_html(f.card(1).unwrap());

        assert!(html.contains(r#"<div class="recipe-card" data-id="1">"#));
        assert!(html.contains(r#"<span class="difficulty easy">easy</span>"#));
        assert!(html.contains(r#"<div id="steps-1" class="steps hidden"><ul><li>Boil pasta</li>"#));
        assert!(html.contains(r#"data-target="ingredients-1">Show Ingredients</button>"#));
        assert!(html.contains(r#"<button class="favorite-btn active" data-id="1">"#));

        let plain = card_html(f.card(2).unwrap());
        assert!(plain.contains(r#"<button class="favorite-btn" data-id="2">"#));
    }

    #[test]
    fn test_card_html_escapes_text() {
        let mut card = frame(&FavoritesSet::new()).cards.remove(0);
        card.title = "<script>alert(1)</script>".to_string();
        let html = card_html(&card);
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_html_renderer_counter() {
        let mut renderer = HtmlRenderer::new(Vec::new());
        renderer.render(&frame(&FavoritesSet::new())).unwrap();
        let out = String::from_utf8(renderer.into_inner()).unwrap();
        assert!(out.contains(r#"<p id="recipe-counter">Showing 3 of 3 recipes</p>"#));
        assert_eq!(out.matches("recipe-card").count(), 3);
    }

    #[test]
    fn test_json_renderer() {
        let mut out = Vec::new();
        JsonRenderer::new(&mut out)
            .render(&frame(&FavoritesSet::new()))
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["shown"], 3);
        assert_eq!(value["label"], "Showing 3 of 3 recipes");
        assert_eq!(value["recipes"][0]["difficulty"], "easy");
    }

    #[test]
    fn test_recording_renderer() {
        let mut recorder = RecordingRenderer::new();
        assert!(recorder.last().is_none());

        let f = frame(&FavoritesSet::new());
        recorder.render(&f).unwrap();
        recorder
            .section_toggled(f.card(2).unwrap(), SectionKind::Ingredients, true)
            .unwrap();

        assert_eq!(recorder.frames.len(), 1);
        assert_eq!(recorder.last().unwrap().ids(), vec![1, 2, 3]);
        assert_eq!(
            recorder.sections[0],
            SectionEvent {
                section: SectionId::ingredients(2),
                visible: true,
                label: "Hide Ingredients".to_string(),
            }
        );
    }
}
