//! In-memory [`Page`] used by the unit tests.
//!
//! Nodes live in an arena and are addressed by index. Timers run on a manual
//! clock so tests decide exactly when each one fires.

use std::collections::BTreeMap;

use crate::page::{FileInfo, Page, Selector, TimerId};

#[derive(Debug, Clone)]
enum Content {
    Element { tag: String },
    Text(String),
    Raw(String),
}

#[derive(Debug, Clone)]
struct FakeNode {
    content: Content,
    parent: Option<usize>,
    children: Vec<usize>,
    attrs: BTreeMap<String, String>,
    styles: BTreeMap<String, String>,
    value: String,
    disabled: bool,
    file: Option<FileInfo>,
}

impl FakeNode {
    fn new(content: Content) -> Self {
        Self {
            content,
            parent: None,
            children: Vec::new(),
            attrs: BTreeMap::new(),
            styles: BTreeMap::new(),
            value: String::new(),
            disabled: false,
            file: None,
        }
    }

    fn tag(&self) -> Option<&str> {
        match &self.content {
            Content::Element { tag } => Some(tag),
            Content::Text(_) | Content::Raw(_) => None,
        }
    }
}

const ROOT: usize = 0;
const HEAD: usize = 1;
const BODY: usize = 2;

pub struct FakePage {
    nodes: Vec<FakeNode>,
    path: String,
    now_ms: u64,
    timers: Vec<(TimerId, u64)>,
    /// Answer returned by the next `confirm` calls.
    pub confirm_answer: bool,
    /// Every message shown through `confirm`.
    pub confirmed: Vec<String>,
    /// Every node passed to `scroll_into_view`.
    pub scrolled: Vec<usize>,
    /// Every timer explicitly disarmed.
    pub cleared: Vec<TimerId>,
}

impl Default for FakePage {
    fn default() -> Self {
        Self::with_path("/")
    }
}

impl FakePage {
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty `<html><head/><body/></html>` document at `path`.
    pub fn with_path(path: &str) -> Self {
        let mut page = Self {
            nodes: Vec::new(),
            path: path.to_owned(),
            now_ms: 0,
            timers: Vec::new(),
            confirm_answer: false,
            confirmed: Vec::new(),
            scrolled: Vec::new(),
            cleared: Vec::new(),
        };
        page.alloc(Content::Element { tag: "html".to_owned() });
        let head = page.alloc(Content::Element { tag: "head".to_owned() });
        let body = page.alloc(Content::Element { tag: "body".to_owned() });
        page.attach(ROOT, head);
        page.attach(ROOT, body);
        page
    }

    pub fn body_node(&self) -> usize {
        BODY
    }

    pub fn head_node(&self) -> usize {
        HEAD
    }

    /// Append a new `<tag class="...">` under `parent`.
    pub fn add(&mut self, parent: usize, tag: &str, class: &str) -> usize {
        let id = self.alloc(Content::Element { tag: tag.to_owned() });
        if !class.is_empty() {
            self.nodes[id].attrs.insert("class".to_owned(), class.to_owned());
        }
        self.attach(parent, id);
        id
    }

    /// Append a required text input holding `value`.
    pub fn add_required_field(&mut self, form: usize, value: &str) -> usize {
        let field = self.add(form, "input", "form-control");
        self.nodes[field].attrs.insert("required".to_owned(), String::new());
        self.nodes[field].value = value.to_owned();
        field
    }

    /// Append a file input under `parent`.
    pub fn add_file_input(&mut self, parent: usize) -> usize {
        let input = self.add(parent, "input", "");
        self.nodes[input].attrs.insert("type".to_owned(), "file".to_owned());
        input
    }

    pub fn select_file(&mut self, input: usize, size: u64, mime: &str) {
        self.nodes[input].value = "C:\\fakepath\\upload".to_owned();
        self.nodes[input].file = Some(FileInfo { name: "upload".to_owned(), size, mime: mime.to_owned() });
    }

    pub fn is_disabled(&self, node: usize) -> bool {
        self.nodes[node].disabled
    }

    pub fn children(&self, node: usize) -> Vec<usize> {
        self.nodes[node]
            .children
            .iter()
            .copied()
            .filter(|child| self.nodes[*child].tag().is_some())
            .collect()
    }

    pub fn parent_of(&self, node: usize) -> Option<usize> {
        self.nodes[node].parent
    }

    /// Concatenated text content of `node` and its descendants.
    pub fn text(&self, node: usize) -> String {
        let mut out = String::new();
        self.collect_text(node, &mut out);
        out
    }

    // --- Timers ---

    pub fn now(&self) -> u64 {
        self.now_ms
    }

    /// Armed timers as `(id, due_ms)`, earliest first.
    pub fn pending_timers(&self) -> Vec<(TimerId, u64)> {
        let mut timers = self.timers.clone();
        timers.sort_by_key(|(id, due)| (*due, *id));
        timers
    }

    /// Pop the earliest timer due at or before `until_ms`, moving the clock to it.
    pub fn pop_due(&mut self, until_ms: u64) -> Option<TimerId> {
        let (index, (id, due)) = self
            .timers
            .iter()
            .copied()
            .enumerate()
            .filter(|(_, (_, due))| *due <= until_ms)
            .min_by_key(|(_, (id, due))| (*due, *id))?;
        self.timers.remove(index);
        self.now_ms = self.now_ms.max(due);
        Some(id)
    }

    pub fn set_now(&mut self, now_ms: u64) {
        self.now_ms = self.now_ms.max(now_ms);
    }

    // --- Internals ---

    fn alloc(&mut self, content: Content) -> usize {
        self.nodes.push(FakeNode::new(content));
        self.nodes.len() - 1
    }

    fn attach(&mut self, parent: usize, child: usize) {
        self.detach(child);
        self.nodes[child].parent = Some(parent);
        self.nodes[parent].children.push(child);
    }

    fn detach(&mut self, node: usize) {
        if let Some(parent) = self.nodes[node].parent.take() {
            self.nodes[parent].children.retain(|c| *c != node);
        }
    }

    fn descendants(&self, root: usize, out: &mut Vec<usize>) {
        for child in &self.nodes[root].children {
            out.push(*child);
            self.descendants(*child, out);
        }
    }

    fn matches(&self, node: usize, selector: &Selector<'_>) -> bool {
        let entry = &self.nodes[node];
        let Some(tag) = entry.tag() else {
            return false;
        };
        match selector {
            Selector::Class(class) => entry
                .attrs
                .get("class")
                .is_some_and(|list| list.split_whitespace().any(|c| c == *class)),
            Selector::Id(id) => entry.attrs.get("id").is_some_and(|v| v.as_str() == *id),
            Selector::Tag(name) => tag.eq_ignore_ascii_case(name),
            Selector::Attribute(name) => entry.attrs.contains_key(*name),
            Selector::AttributeEquals { name, value } => entry.attrs.get(*name).is_some_and(|v| v.as_str() == *value),
            Selector::AttributePrefix { name, prefix } => {
                entry.attrs.get(*name).is_some_and(|v| v.starts_with(*prefix))
            }
        }
    }

    fn collect_text(&self, node: usize, out: &mut String) {
        match &self.nodes[node].content {
            Content::Text(text) | Content::Raw(text) => out.push_str(text),
            Content::Element { .. } => {
                for child in &self.nodes[node].children {
                    self.collect_text(*child, out);
                }
            }
        }
    }

    fn serialize(&self, node: usize, out: &mut String) {
        match &self.nodes[node].content {
            Content::Text(text) => out.push_str(&escape(text)),
            Content::Raw(html) => out.push_str(html),
            Content::Element { tag } => {
                out.push('<');
                out.push_str(tag);
                for (name, value) in &self.nodes[node].attrs {
                    if value.is_empty() {
                        out.push_str(&format!(" {name}"));
                    } else {
                        out.push_str(&format!(" {name}=\"{}\"", escape(value)));
                    }
                }
                out.push('>');
                for child in &self.nodes[node].children {
                    self.serialize(*child, out);
                }
                out.push_str(&format!("</{tag}>"));
            }
        }
    }
}

fn escape(raw: &str) -> String {
    raw.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;").replace('"', "&quot;")
}

impl Page for FakePage {
    type Node = usize;

    fn query(&self, selector: &Selector<'_>) -> Option<usize> {
        self.query_all(selector).into_iter().next()
    }

    fn query_all(&self, selector: &Selector<'_>) -> Vec<usize> {
        let mut all = vec![ROOT];
        self.descendants(ROOT, &mut all);
        all.into_iter().filter(|n| self.matches(*n, selector)).collect()
    }

    fn query_within(&self, root: &usize, selector: &Selector<'_>) -> Vec<usize> {
        let mut all = Vec::new();
        self.descendants(*root, &mut all);
        all.into_iter().filter(|n| self.matches(*n, selector)).collect()
    }

    fn closest(&self, node: &usize, selector: &Selector<'_>) -> Option<usize> {
        let mut cursor = Some(*node);
        while let Some(current) = cursor {
            if self.matches(current, selector) {
                return Some(current);
            }
            cursor = self.nodes[current].parent;
        }
        None
    }

    fn head(&self) -> Option<usize> {
        Some(HEAD)
    }

    fn body(&self) -> Option<usize> {
        Some(BODY)
    }

    fn path_name(&self) -> String {
        self.path.clone()
    }

    fn create_element(&mut self, tag: &str) -> Option<usize> {
        Some(self.alloc(Content::Element { tag: tag.to_owned() }))
    }

    fn append_child(&mut self, parent: &usize, child: &usize) {
        self.attach(*parent, *child);
    }

    fn append_text(&mut self, parent: &usize, text: &str) {
        let node = self.alloc(Content::Text(text.to_owned()));
        self.attach(*parent, node);
    }

    fn insert_after(&mut self, anchor: &usize, node: &usize) {
        let Some(parent) = self.nodes[*anchor].parent else {
            return;
        };
        self.detach(*node);
        let siblings = &mut self.nodes[parent].children;
        let index = siblings.iter().position(|c| c == anchor).map_or(siblings.len(), |i| i + 1);
        siblings.insert(index, *node);
        self.nodes[*node].parent = Some(parent);
    }

    fn remove(&mut self, node: &usize) {
        self.detach(*node);
    }

    fn is_attached(&self, node: &usize) -> bool {
        let mut cursor = *node;
        loop {
            if cursor == ROOT {
                return true;
            }
            match self.nodes[cursor].parent {
                Some(parent) => cursor = parent,
                None => return false,
            }
        }
    }

    fn attribute(&self, node: &usize, name: &str) -> Option<String> {
        self.nodes[*node].attrs.get(name).cloned()
    }

    fn set_attribute(&mut self, node: &usize, name: &str, value: &str) {
        self.nodes[*node].attrs.insert(name.to_owned(), value.to_owned());
    }

    fn remove_attribute(&mut self, node: &usize, name: &str) {
        self.nodes[*node].attrs.remove(name);
    }

    fn has_class(&self, node: &usize, class: &str) -> bool {
        self.matches(*node, &Selector::Class(class))
    }

    fn add_class(&mut self, node: &usize, class: &str) {
        if self.has_class(node, class) {
            return;
        }
        let list = self.nodes[*node].attrs.entry("class".to_owned()).or_default();
        if !list.is_empty() {
            list.push(' ');
        }
        list.push_str(class);
    }

    fn remove_class(&mut self, node: &usize, class: &str) {
        if let Some(list) = self.nodes[*node].attrs.get_mut("class") {
            *list = list.split_whitespace().filter(|c| *c != class).collect::<Vec<_>>().join(" ");
        }
    }

    fn style(&self, node: &usize, property: &str) -> String {
        self.nodes[*node].styles.get(property).cloned().unwrap_or_default()
    }

    fn set_style(&mut self, node: &usize, property: &str, value: &str) {
        self.nodes[*node].styles.insert(property.to_owned(), value.to_owned());
    }

    fn inner_html(&self, node: &usize) -> String {
        let mut out = String::new();
        for child in &self.nodes[*node].children {
            self.serialize(*child, &mut out);
        }
        out
    }

    fn set_inner_html(&mut self, node: &usize, html: &str) {
        for child in std::mem::take(&mut self.nodes[*node].children) {
            self.nodes[child].parent = None;
        }
        if !html.is_empty() {
            let raw = self.alloc(Content::Raw(html.to_owned()));
            self.attach(*node, raw);
        }
    }

    fn value(&self, node: &usize) -> String {
        self.nodes[*node].value.clone()
    }

    fn set_value(&mut self, node: &usize, value: &str) {
        let entry = &mut self.nodes[*node];
        entry.value = value.to_owned();
        if value.is_empty() {
            entry.file = None;
        }
    }

    fn set_disabled(&mut self, node: &usize, disabled: bool) {
        self.nodes[*node].disabled = disabled;
    }

    fn selected_file(&self, node: &usize) -> Option<FileInfo> {
        self.nodes[*node].file.clone()
    }

    fn scroll_into_view(&mut self, node: &usize) {
        self.scrolled.push(*node);
    }

    fn confirm(&mut self, message: &str) -> bool {
        self.confirmed.push(message.to_owned());
        self.confirm_answer
    }

    fn set_timeout(&mut self, id: TimerId, delay_ms: u32) {
        self.timers.push((id, self.now_ms + u64::from(delay_ms)));
    }

    fn clear_timeout(&mut self, id: TimerId) {
        self.timers.retain(|(armed, _)| *armed != id);
        self.cleared.push(id);
    }
}
