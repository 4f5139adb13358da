//! In-memory screen used for replaying recorded screens and for tests.
//!
//! A `SimulatedScreen` is a list of pages. Each page is what the host would
//! report at one scroll offset. Scrolling forward and backward moves between
//! pages and is refused at the boundaries, exactly like a real scrollable
//! container. With `repeat_last_page` set, forward scrolling at the end keeps
//! succeeding without revealing anything new, which is how an endless feed
//! looks from the outside.
//!
//! Screens are built either from Rust (`NodeSpec` helpers) or from a JSON
//! fixture:
//!
//! ```json
//! {
//!   "start_page": 1,
//!   "clipboard": "previous clipboard",
//!   "pages": [
//!     [{ "kind": "application", "layer": 0, "root": { "scrollable": true, "children": [
//!         { "text": "First", "bounds": { "top": 0, "left": 0, "bottom": 40, "right": 300 } }
//!     ] } }]
//!   ]
//! }
//! ```

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use serde::{Deserialize, Serialize};

use crate::node::{Clipboard, ElementNode, NodeAction, ScreenSource, WindowSnapshot};
use crate::types::{ExtractionError, Rect, WindowKind};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Kinds of actions a simulated node can be told to refuse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    ScrollForward,
    ScrollBackward,
    SetSelection,
    Copy,
    ClearSelection,
    SetText,
}

impl From<&NodeAction> for ActionKind {
    fn from(action: &NodeAction) -> Self {
        match action {
            NodeAction::ScrollForward => ActionKind::ScrollForward,
            NodeAction::ScrollBackward => ActionKind::ScrollBackward,
            NodeAction::SetSelection { .. } => ActionKind::SetSelection,
            NodeAction::Copy => ActionKind::Copy,
            NodeAction::ClearSelection => ActionKind::ClearSelection,
            NodeAction::SetText(_) => ActionKind::SetText,
        }
    }
}

/// Description of one element in a simulated tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSpec {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub content_description: Option<String>,
    #[serde(default)]
    pub class_name: Option<String>,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default)]
    pub password: bool,
    #[serde(default)]
    pub editable: bool,
    #[serde(default)]
    pub focused: bool,
    #[serde(default)]
    pub scrollable: bool,
    #[serde(default)]
    pub range_selectable: bool,
    /// Text placed on the clipboard when a full selection is copied.
    /// Defaults to the concatenated text of the subtree.
    #[serde(default)]
    pub selection_text: Option<String>,
    #[serde(default)]
    pub refused_actions: Vec<ActionKind>,
    /// Simulates a reference that went stale: the parent cannot hand it out
    #[serde(default)]
    pub stale: bool,
    #[serde(default)]
    pub bounds: Rect,
    #[serde(default)]
    pub children: Vec<NodeSpec>,
}

fn default_true() -> bool {
    true
}

impl Default for NodeSpec {
    fn default() -> Self {
        Self {
            text: None,
            content_description: None,
            class_name: None,
            visible: true,
            password: false,
            editable: false,
            focused: false,
            scrollable: false,
            range_selectable: false,
            selection_text: None,
            refused_actions: Vec::new(),
            stale: false,
            bounds: Rect::default(),
            children: Vec::new(),
        }
    }
}

impl NodeSpec {
    pub fn text(text: &str, bounds: Rect) -> Self {
        Self {
            text: Some(text.to_string()),
            bounds,
            ..Self::default()
        }
    }

    pub fn description(description: &str, bounds: Rect) -> Self {
        Self {
            content_description: Some(description.to_string()),
            bounds,
            ..Self::default()
        }
    }

    pub fn group(bounds: Rect, children: Vec<NodeSpec>) -> Self {
        Self {
            bounds,
            children,
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.content_description = Some(description.to_string());
        self
    }

    pub fn with_class(mut self, class_name: &str) -> Self {
        self.class_name = Some(class_name.to_string());
        self
    }

    pub fn with_selection_text(mut self, text: &str) -> Self {
        self.selection_text = Some(text.to_string());
        self
    }

    pub fn refusing(mut self, action: ActionKind) -> Self {
        self.refused_actions.push(action);
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    pub fn password(mut self) -> Self {
        self.password = true;
        self
    }

    pub fn scrollable(mut self) -> Self {
        self.scrollable = true;
        self
    }

    pub fn range_selectable(mut self) -> Self {
        self.range_selectable = true;
        self
    }

    pub fn stale(mut self) -> Self {
        self.stale = true;
        self
    }

    fn subtree_text(&self, out: &mut Vec<String>) {
        if let Some(text) = self.text.as_deref().map(str::trim) {
            if !text.is_empty() {
                out.push(text.to_string());
            }
        }
        for child in &self.children {
            child.subtree_text(out);
        }
    }
}

/// One window on one page of a fixture.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowFixture {
    #[serde(default = "default_kind")]
    pub kind: WindowKind,
    #[serde(default)]
    pub layer: i32,
    pub root: NodeSpec,
}

fn default_kind() -> WindowKind {
    WindowKind::Application
}

/// JSON fixture describing a scrollable screen.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScreenFixture {
    /// Page shown before extraction starts
    #[serde(default)]
    pub start_page: usize,
    /// Forward scrolling at the last page succeeds without moving
    #[serde(default)]
    pub repeat_last_page: bool,
    /// Clipboard content before extraction starts
    #[serde(default)]
    pub clipboard: Option<String>,
    pub pages: Vec<Vec<WindowFixture>>,
}

/// Shared in-memory clipboard.
#[derive(Debug, Default)]
pub struct SimulatedClipboard {
    content: Mutex<Option<String>>,
}

impl SimulatedClipboard {
    pub fn new(initial: Option<String>) -> Self {
        Self {
            content: Mutex::new(initial),
        }
    }

    pub fn contents(&self) -> Option<String> {
        lock(&self.content).clone()
    }
}

impl Clipboard for SimulatedClipboard {
    fn read_text(&self) -> Option<String> {
        lock(&self.content).clone().filter(|text| !text.is_empty())
    }

    fn write_text(&self, text: &str) {
        *lock(&self.content) = Some(text.to_string());
    }

    fn clear(&self) {
        *lock(&self.content) = None;
    }
}

/// An action a node received and whether it was accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionRecord {
    pub action: NodeAction,
    pub accepted: bool,
}

#[derive(Debug)]
struct ElementData {
    spec: NodeSpec,
    children: Vec<Arc<ElementData>>,
}

impl ElementData {
    fn build(spec: &NodeSpec) -> Arc<Self> {
        let children = spec.children.iter().map(Self::build).collect();
        let mut own = spec.clone();
        own.children.clear();
        Arc::new(Self {
            spec: own,
            children,
        })
    }

    fn subtree_text(&self, out: &mut Vec<String>) {
        self.spec.subtree_text(out);
        for child in &self.children {
            child.subtree_text(out);
        }
    }
}

#[derive(Debug)]
struct PageWindow {
    kind: WindowKind,
    layer: i32,
    root: Arc<ElementData>,
}

#[derive(Debug)]
struct ScreenState {
    pages: Vec<Vec<PageWindow>>,
    repeat_last_page: bool,
    position: Mutex<usize>,
    selection: Mutex<Option<String>>,
    actions: Mutex<Vec<ActionRecord>>,
    snapshots: Mutex<Vec<usize>>,
    clipboard: Arc<SimulatedClipboard>,
}

impl ScreenState {
    fn scroll_forward(&self) -> bool {
        let mut position = lock(&self.position);
        if *position + 1 < self.pages.len() {
            *position += 1;
            true
        } else {
            self.repeat_last_page && !self.pages.is_empty()
        }
    }

    fn scroll_backward(&self) -> bool {
        let mut position = lock(&self.position);
        if *position > 0 {
            *position -= 1;
            true
        } else {
            false
        }
    }
}

/// Handle to one element of a simulated screen.
#[derive(Debug, Clone)]
pub struct SimNode {
    element: Arc<ElementData>,
    screen: Arc<ScreenState>,
}

impl SimNode {
    /// A node with its own single-page screen, for exercising one element.
    pub fn detached(spec: NodeSpec) -> Self {
        let screen = SimulatedScreen::from_pages(vec![spec]);
        let element = screen.state.pages[0][0].root.clone();
        Self {
            element,
            screen: screen.state,
        }
    }

    fn apply(&self, action: &NodeAction) -> bool {
        let spec = &self.element.spec;
        if spec.refused_actions.contains(&ActionKind::from(action)) {
            return false;
        }
        match action {
            NodeAction::ScrollForward => spec.scrollable && self.screen.scroll_forward(),
            NodeAction::ScrollBackward => spec.scrollable && self.screen.scroll_backward(),
            NodeAction::SetSelection { start, end } => {
                if !spec.range_selectable || start > end {
                    return false;
                }
                let text = spec.selection_text.clone().unwrap_or_else(|| {
                    let mut parts = Vec::new();
                    self.element.subtree_text(&mut parts);
                    parts.join("\n")
                });
                *lock(&self.screen.selection) = Some(text);
                true
            }
            NodeAction::Copy => match lock(&self.screen.selection).clone() {
                Some(text) => {
                    self.screen.clipboard.write_text(&text);
                    true
                }
                None => false,
            },
            NodeAction::ClearSelection => {
                *lock(&self.screen.selection) = None;
                true
            }
            NodeAction::SetText(_) => spec.editable,
        }
    }
}

impl ElementNode for SimNode {
    fn is_visible(&self) -> bool {
        self.element.spec.visible
    }

    fn is_password(&self) -> bool {
        self.element.spec.password
    }

    fn is_editable(&self) -> bool {
        self.element.spec.editable
    }

    fn is_focused(&self) -> bool {
        self.element.spec.focused
    }

    fn is_scrollable(&self) -> bool {
        self.element.spec.scrollable
    }

    fn supports_range_selection(&self) -> bool {
        self.element.spec.range_selectable
    }

    fn class_name(&self) -> Option<String> {
        self.element.spec.class_name.clone()
    }

    fn text(&self) -> Option<String> {
        self.element.spec.text.clone()
    }

    fn content_description(&self) -> Option<String> {
        self.element.spec.content_description.clone()
    }

    fn bounds_in_screen(&self) -> Rect {
        self.element.spec.bounds
    }

    fn child_count(&self) -> usize {
        self.element.children.len()
    }

    fn child(&self, index: usize) -> Option<Self> {
        let element = self.element.children.get(index)?;
        if element.spec.stale {
            return None;
        }
        Some(Self {
            element: element.clone(),
            screen: self.screen.clone(),
        })
    }

    fn perform_action(&self, action: &NodeAction) -> bool {
        let accepted = self.apply(action);
        lock(&self.screen.actions).push(ActionRecord {
            action: action.clone(),
            accepted,
        });
        accepted
    }
}

/// A scrollable screen backed by pages held in memory.
#[derive(Debug, Clone)]
pub struct SimulatedScreen {
    state: Arc<ScreenState>,
}

impl SimulatedScreen {
    /// Build a screen from a fixture.
    ///
    /// # Errors
    ///
    /// - `ExtractionError::Fixture` - no pages, or `start_page` out of range
    pub fn from_fixture(fixture: ScreenFixture) -> Result<Self, ExtractionError> {
        if fixture.pages.is_empty() {
            return Err(ExtractionError::Fixture("fixture has no pages".into()));
        }
        if fixture.start_page >= fixture.pages.len() {
            return Err(ExtractionError::Fixture(format!(
                "start_page {} out of range ({} pages)",
                fixture.start_page,
                fixture.pages.len()
            )));
        }

        let pages = fixture
            .pages
            .iter()
            .map(|windows| {
                windows
                    .iter()
                    .map(|w| PageWindow {
                        kind: w.kind,
                        layer: w.layer,
                        root: ElementData::build(&w.root),
                    })
                    .collect()
            })
            .collect();

        Ok(Self {
            state: Arc::new(ScreenState {
                pages,
                repeat_last_page: fixture.repeat_last_page,
                position: Mutex::new(fixture.start_page),
                selection: Mutex::new(None),
                actions: Mutex::new(Vec::new()),
                snapshots: Mutex::new(Vec::new()),
                clipboard: Arc::new(SimulatedClipboard::new(fixture.clipboard)),
            }),
        })
    }

    /// Parse a JSON fixture.
    pub fn from_json(json: &str) -> Result<Self, ExtractionError> {
        let fixture: ScreenFixture =
            serde_json::from_str(json).map_err(|e| ExtractionError::Fixture(e.to_string()))?;
        Self::from_fixture(fixture)
    }

    /// Load a JSON fixture from disk.
    pub fn load(path: &Path) -> Result<Self, ExtractionError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// One application window per page, starting at the first page.
    pub fn from_pages(pages: Vec<NodeSpec>) -> Self {
        let fixture = ScreenFixture {
            pages: pages
                .into_iter()
                .map(|root| {
                    vec![WindowFixture {
                        kind: WindowKind::Application,
                        layer: 0,
                        root,
                    }]
                })
                .collect(),
            ..ScreenFixture::default()
        };
        // A single empty page keeps the screen valid when no pages are given
        Self::from_fixture(fixture).unwrap_or_else(|_| Self::from_pages(vec![NodeSpec::default()]))
    }

    /// A scrollable list whose page `k` shows the lines `pages[k]`, one
    /// line per row, stacked top to bottom.
    pub fn from_line_pages(pages: &[Vec<String>]) -> Self {
        let specs = pages
            .iter()
            .map(|lines| {
                let children = lines
                    .iter()
                    .enumerate()
                    .map(|(row, line)| {
                        let top = row as i32 * 50;
                        NodeSpec::text(line, Rect::new(top, 0, top + 40, 1000))
                    })
                    .collect();
                NodeSpec::group(Rect::new(0, 0, 2000, 1000), children).scrollable()
            })
            .collect();
        Self::from_pages(specs)
    }

    /// Move to `page` before extraction starts.
    pub fn starting_at(self, page: usize) -> Self {
        if page < self.state.pages.len() {
            *lock(&self.state.position) = page;
        }
        self
    }

    pub fn position(&self) -> usize {
        *lock(&self.state.position)
    }

    pub fn page_count(&self) -> usize {
        self.state.pages.len()
    }

    /// Every action received so far, in order.
    pub fn actions(&self) -> Vec<ActionRecord> {
        lock(&self.state.actions).clone()
    }

    /// Page index at each call to `list_windows`.
    pub fn snapshot_positions(&self) -> Vec<usize> {
        lock(&self.state.snapshots).clone()
    }

    pub fn clipboard(&self) -> Arc<SimulatedClipboard> {
        self.state.clipboard.clone()
    }

    /// Text currently selected on screen, if any.
    pub fn selection(&self) -> Option<String> {
        lock(&self.state.selection).clone()
    }

    fn node(&self, element: &Arc<ElementData>) -> SimNode {
        SimNode {
            element: element.clone(),
            screen: self.state.clone(),
        }
    }
}

impl ScreenSource for SimulatedScreen {
    type Node = SimNode;

    fn list_windows(&self) -> Vec<WindowSnapshot<SimNode>> {
        let position = self.position();
        lock(&self.state.snapshots).push(position);
        self.state
            .pages
            .get(position)
            .map(|windows| {
                windows
                    .iter()
                    .map(|w| WindowSnapshot::new(w.kind, w.layer, self.node(&w.root)))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn active_root(&self) -> Option<SimNode> {
        let position = self.position();
        let page = self.state.pages.get(position)?;
        page.iter()
            .find(|w| w.kind.is_application())
            .or_else(|| page.first())
            .map(|w| self.node(&w.root))
    }
}
