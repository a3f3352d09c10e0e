//! Weekly tree model
//!
//! Groups a week's task items into a three level tree for hierarchical
//! display: the week, seven day containers (Monday to Sunday), and one
//! leaf per task item.
//!
//! Nodes live in an arena owned by the model and are addressed by
//! [`NodeId`]. Children are held in order by their parent; the parent
//! link is an index back into the same arena.
//!
//! The model is filled exactly once. `WeeklyTreeModel<Unpopulated>` only
//! offers [`WeeklyTreeModel::populate`], which consumes it and returns a
//! `WeeklyTreeModel<Populated>`. Navigation works in both states.

use super::date_traverser::{day_name, WeekAnchor, WEEK_DAYS};
use crate::database::TaskItem;
use chrono::Weekday;
use std::collections::HashMap;
use std::marker::PhantomData;

/// Root and day containers exist, no leaves yet
#[derive(Debug)]
pub struct Unpopulated;

/// Leaves have been inserted
#[derive(Debug)]
pub struct Populated;

/// Handle to a node of one particular model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// Display columns, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    /// Project display name on leaves, label on containers
    Project = 0,
    Duration = 1,
    Category = 2,
    Description = 3,
    Id = 4,
}

impl Column {
    pub const COUNT: usize = 5;

    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Column::Project),
            1 => Some(Column::Duration),
            2 => Some(Column::Category),
            3 => Some(Column::Description),
            4 => Some(Column::Id),
            _ => None,
        }
    }

    pub fn value_type(self) -> ColumnType {
        match self {
            Column::Id => ColumnType::Long,
            _ => ColumnType::String,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    String,
    Long,
}

impl ColumnType {
    pub fn as_str(self) -> &'static str {
        match self {
            ColumnType::String => "string",
            ColumnType::Long => "long",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ColumnValue {
    Text(String),
    Integer(i64),
}

/// Data shown for one task item
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LeafData {
    pub project_name: String,
    pub duration: String,
    pub category_name: String,
    pub description: String,
    pub task_item_id: i64,
}

/// Anything that can be placed under a day of the week
pub trait DayEntry {
    /// ISO-8601 date of the day the entry belongs to
    fn day_iso_date(&self) -> String;

    fn into_leaf(self) -> LeafData;
}

impl DayEntry for TaskItem {
    fn day_iso_date(&self) -> String {
        self.task_date()
            .format(crate::config::ISO_DATE_FORMAT)
            .to_string()
    }

    fn into_leaf(self) -> LeafData {
        LeafData {
            project_name: self.project.display_name,
            duration: self.duration,
            category_name: self.category.name,
            description: self.description,
            task_item_id: self.task_item_id,
        }
    }
}

#[derive(Debug)]
enum NodeKind {
    Container { label: String },
    Leaf(LeafData),
}

#[derive(Debug)]
struct WeekNode {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    kind: NodeKind,
}

#[derive(Debug)]
pub struct WeeklyTreeModel<State = Unpopulated> {
    nodes: Vec<WeekNode>,
    root: NodeId,
    /// Day container and its ISO date, Monday first
    days: [(NodeId, String); 7],
    _state: PhantomData<State>,
}

impl WeeklyTreeModel<Unpopulated> {
    /// Build the week root and its seven empty day containers
    pub fn new(anchor: &impl WeekAnchor) -> Self {
        let monday = anchor.day_iso_date(Weekday::Mon);
        let sunday = anchor.day_iso_date(Weekday::Sun);

        let root_node = WeekNode {
            parent: None,
            children: Vec::with_capacity(7),
            kind: NodeKind::Container {
                label: format!("Week {} - {}", monday, sunday),
            },
        };

        let mut nodes = vec![root_node];
        let root = NodeId(0);

        let days = WEEK_DAYS.map(|day| {
            let date = anchor.day_iso_date(day);
            let id = NodeId(nodes.len());
            nodes.push(WeekNode {
                parent: Some(root),
                children: Vec::new(),
                kind: NodeKind::Container {
                    label: format!("{} {}", day_name(day), date),
                },
            });
            (id, date)
        });

        nodes[root.0].children = days.iter().map(|(id, _)| *id).collect();

        Self {
            nodes,
            root,
            days,
            _state: PhantomData,
        }
    }

    /// Insert one leaf per entry under the day matching its date.
    ///
    /// Entries keep their input order within a day. Entries dated outside
    /// the week are dropped.
    pub fn populate<E, I>(mut self, entries: I) -> WeeklyTreeModel<Populated>
    where
        E: DayEntry,
        I: IntoIterator<Item = E>,
    {
        let mut buckets: HashMap<String, Vec<LeafData>> = HashMap::new();
        for entry in entries {
            let date = entry.day_iso_date();
            buckets.entry(date).or_default().push(entry.into_leaf());
        }

        let days = self.days.clone();
        for (day_node, date) in &days {
            if let Some(leaves) = buckets.remove(date) {
                self.append_leaves(*day_node, leaves);
            }
        }

        for (date, leaves) in &buckets {
            tracing::warn!(
                "Dropping {} task item(s) dated {} outside the displayed week",
                leaves.len(),
                date
            );
        }

        tracing::debug!("Weekly model populated with {} nodes", self.nodes.len());

        WeeklyTreeModel {
            nodes: self.nodes,
            root: self.root,
            days: self.days,
            _state: PhantomData,
        }
    }

    fn append_leaves(&mut self, day_node: NodeId, leaves: Vec<LeafData>) {
        for leaf in leaves {
            let id = NodeId(self.nodes.len());
            self.nodes.push(WeekNode {
                parent: Some(day_node),
                children: Vec::new(),
                kind: NodeKind::Leaf(leaf),
            });
            self.nodes[day_node.0].children.push(id);
        }
    }
}

impl<State> WeeklyTreeModel<State> {
    fn node(&self, id: NodeId) -> Option<&WeekNode> {
        self.nodes.get(id.0)
    }

    /// The week node, entry point of the tree
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Container node for a weekday
    pub fn day_node(&self, day: Weekday) -> NodeId {
        self.days[day.num_days_from_monday() as usize].0
    }

    pub fn column_count(&self) -> usize {
        Column::COUNT
    }

    /// Value type of a column; unknown columns report as strings
    pub fn column_type(&self, column: usize) -> ColumnType {
        Column::from_index(column).map_or(ColumnType::String, Column::value_type)
    }

    /// Owning container, or `None` for the root and for no item
    pub fn parent(&self, item: Option<NodeId>) -> Option<NodeId> {
        let id = item?;
        if id == self.root {
            return None;
        }
        self.node(id)?.parent
    }

    /// No item counts as a container, since it stands for the invisible top
    pub fn is_container(&self, item: Option<NodeId>) -> bool {
        match item {
            None => true,
            Some(id) => matches!(
                self.node(id).map(|n| &n.kind),
                Some(NodeKind::Container { .. })
            ),
        }
    }

    /// Ordered children of `item`. Without an item, yields just the root.
    pub fn children(&self, item: Option<NodeId>) -> Vec<NodeId> {
        match item {
            None => vec![self.root],
            Some(id) => self
                .node(id)
                .map(|n| n.children.clone())
                .unwrap_or_default(),
        }
    }

    /// Label of a container node
    pub fn label(&self, id: NodeId) -> Option<&str> {
        match &self.node(id)?.kind {
            NodeKind::Container { label } => Some(label),
            NodeKind::Leaf(_) => None,
        }
    }

    /// Task item data of a leaf node
    pub fn leaf(&self, id: NodeId) -> Option<&LeafData> {
        match &self.node(id)?.kind {
            NodeKind::Leaf(data) => Some(data),
            NodeKind::Container { .. } => None,
        }
    }

    /// Value shown for `id` in `column`.
    ///
    /// Containers only carry their label, in the project column. Returns
    /// `None` and logs an error for an unknown column or node.
    pub fn value(&self, id: NodeId, column: usize) -> Option<ColumnValue> {
        let Some(col) = Column::from_index(column) else {
            tracing::error!("WeeklyTreeModel::value: wrong column {}", column);
            return None;
        };
        let Some(node) = self.node(id) else {
            tracing::error!("WeeklyTreeModel::value: unknown node {:?}", id);
            return None;
        };

        let value = match (&node.kind, col) {
            (NodeKind::Container { label }, Column::Project) => ColumnValue::Text(label.clone()),
            (NodeKind::Container { .. }, Column::Id) => ColumnValue::Integer(0),
            (NodeKind::Container { .. }, _) => ColumnValue::Text(String::new()),
            (NodeKind::Leaf(leaf), Column::Project) => ColumnValue::Text(leaf.project_name.clone()),
            (NodeKind::Leaf(leaf), Column::Duration) => ColumnValue::Text(leaf.duration.clone()),
            (NodeKind::Leaf(leaf), Column::Category) => {
                ColumnValue::Text(leaf.category_name.clone())
            }
            (NodeKind::Leaf(leaf), Column::Description) => {
                ColumnValue::Text(leaf.description.clone())
            }
            (NodeKind::Leaf(leaf), Column::Id) => ColumnValue::Integer(leaf.task_item_id),
        };

        Some(value)
    }

    /// Edit the in-memory value of `id` in `column`.
    ///
    /// Nothing is written back to storage. Returns `false` when the column
    /// or node is unknown, the value has the wrong type, or the column is
    /// not editable on a container.
    pub fn set_value(&mut self, id: NodeId, column: usize, value: ColumnValue) -> bool {
        let Some(col) = Column::from_index(column) else {
            tracing::error!("WeeklyTreeModel::set_value: wrong column {}", column);
            return false;
        };
        let Some(node) = self.nodes.get_mut(id.0) else {
            tracing::error!("WeeklyTreeModel::set_value: unknown node {:?}", id);
            return false;
        };

        match (&mut node.kind, col, value) {
            (NodeKind::Container { label }, Column::Project, ColumnValue::Text(text)) => {
                *label = text;
            }
            (NodeKind::Leaf(leaf), Column::Project, ColumnValue::Text(text)) => {
                leaf.project_name = text;
            }
            (NodeKind::Leaf(leaf), Column::Duration, ColumnValue::Text(text)) => {
                leaf.duration = text;
            }
            (NodeKind::Leaf(leaf), Column::Category, ColumnValue::Text(text)) => {
                leaf.category_name = text;
            }
            (NodeKind::Leaf(leaf), Column::Description, ColumnValue::Text(text)) => {
                leaf.description = text;
            }
            (NodeKind::Leaf(leaf), Column::Id, ColumnValue::Integer(task_item_id)) => {
                leaf.task_item_id = task_item_id;
            }
            (_, col, value) => {
                tracing::warn!(
                    "WeeklyTreeModel::set_value: {:?} not applicable to column {:?}",
                    value,
                    col
                );
                return false;
            }
        }

        true
    }
}
