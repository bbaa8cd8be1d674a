//! Retained scene graph: the nodes a scene has placed on the canvas.

/// Handle to a node in a [`SceneGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

/// Axis-aligned rectangle in engine coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// A rectangle of the given size centred on `(cx, cy)`.
    pub fn centered(cx: f32, cy: f32, width: f32, height: f32) -> Self {
        Self::new(cx - width / 2.0, cy - height / 2.0, width, height)
    }

    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.x && px < self.x + self.width && py >= self.y && py < self.y + self.height
    }
}

/// What a node draws.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// A textured image.
    Image {
        texture: String,
        scale: f32,
        tint: Option<u32>,
    },
    /// A text label.
    Text { content: String },
    /// A filled rectangle.
    Rect { color: u32, alpha: f32 },
    /// A rectangle outline.
    Outline { color: u32, line_width: f32 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: NodeId,
    pub kind: NodeKind,
    pub bounds: Bounds,
    pub interactive: bool,
}

/// Nodes in draw order (later nodes draw on top).
#[derive(Debug, Default)]
pub struct SceneGraph {
    nodes: Vec<Node>,
    next_id: u32,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node on top of everything else.
    pub fn add(&mut self, kind: NodeKind, bounds: Bounds) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.push(Node {
            id,
            kind,
            bounds,
            interactive: false,
        });
        id
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    /// Mark a node as a pointer target.
    pub fn set_interactive(&mut self, id: NodeId, interactive: bool) {
        if let Some(node) = self.get_mut(id) {
            node.interactive = interactive;
        }
    }

    /// Set an image node's tint. Returns `false` for missing or non-image nodes.
    pub fn set_tint(&mut self, id: NodeId, color: u32) -> bool {
        match self.get_mut(id).map(|n| &mut n.kind) {
            Some(NodeKind::Image { tint, .. }) => {
                *tint = Some(color);
                true
            }
            _ => false,
        }
    }

    /// Resize a node in place.
    pub fn set_bounds(&mut self, id: NodeId, bounds: Bounds) {
        if let Some(node) = self.get_mut(id) {
            node.bounds = bounds;
        }
    }

    /// Remove a single node.
    pub fn remove(&mut self, id: NodeId) -> bool {
        let before = self.nodes.len();
        self.nodes.retain(|n| n.id != id);
        self.nodes.len() != before
    }

    /// Top-most interactive node under the point.
    pub fn hit_test(&self, x: f32, y: f32) -> Option<NodeId> {
        self.nodes
            .iter()
            .rev()
            .find(|n| n.interactive && n.bounds.contains(x, y))
            .map(|n| n.id)
    }

    /// Destroy every node. Returns how many were removed.
    pub fn destroy(&mut self) -> usize {
        let count = self.nodes.len();
        self.nodes.clear();
        count
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Text content of every text node, in draw order.
    pub fn texts(&self) -> Vec<&str> {
        self.nodes
            .iter()
            .filter_map(|n| match &n.kind {
                NodeKind::Text { content } => Some(content.as_str()),
                _ => None,
            })
            .collect()
    }
}
