use flowgraph_common::Token;

use crate::arena::NodeId;

/// One case per concrete AST node kind.
///
/// This is the tagged-variant reification the design calls for: rather than
/// a class hierarchy, every node kind is one arm of this enum, and every
/// child reference is a [`NodeId`] back into the [`crate::Arena`] that owns
/// it. Variants that the grammar gives named children (e.g. `IfElse`'s
/// `condition`/`true_branch`/`false_branch`) store those as their own
/// fields; variants that are just an ordered list (e.g. `Root`, `Collection`)
/// store a `Vec<NodeId>` instead. [`NodeKind::labeled_children`] unifies both
/// shapes for the graph emitter.
#[derive(Debug, Clone)]
pub enum NodeKind {
    Root(Vec<NodeId>),
    Block(Vec<NodeId>),
    IfElse {
        condition: NodeId,
        true_branch: NodeId,
        false_branch: Option<NodeId>,
    },
    While {
        condition: NodeId,
        body: NodeId,
    },
    For {
        iterator: NodeId,
        body: NodeId,
    },
    Return(NodeId),
    Yield(NodeId),
    Await(NodeId),
    Definition {
        name: NodeId,
        signature: NodeId,
        body: NodeId,
    },
    Binary {
        left: NodeId,
        op: NodeId,
        right: NodeId,
    },
    Unary {
        op: NodeId,
        expr: NodeId,
    },
    Conditional {
        condition: NodeId,
        then_branch: NodeId,
        else_branch: NodeId,
    },
    Assignment {
        target: NodeId,
        op: Option<NodeId>,
        value: NodeId,
        annotation: Option<NodeId>,
    },
    Invocation {
        target: NodeId,
        args: Vec<NodeId>,
    },
    Indexer {
        target: NodeId,
        index: NodeId,
    },
    Slice {
        start: Option<NodeId>,
        stop: Option<NodeId>,
        step: Option<NodeId>,
    },
    MemberRef {
        target: NodeId,
        name: NodeId,
    },
    Lambda {
        params: Vec<NodeId>,
        body: NodeId,
    },
    Generator {
        expr: NodeId,
        iterator: NodeId,
        conditions: Vec<NodeId>,
    },
    Collection(Vec<NodeId>),
    KeyValue {
        key: NodeId,
        value: NodeId,
    },

    // ── Terminals ────────────────────────────────────────────────────
    Id(String),
    StringLit(String),
    NumberLit(String),
    NoneLit,
    BoolLit(String),
    OperatorLit(String),
    EasterEggLit,

    /// Opaque sub-range the parser chose not to structure (e.g. a function
    /// signature). The emitter must not descend into this.
    WrapperNode(Vec<Token>),
}

/// A child slot as the emitter sees it: an optional field name (`None` for
/// nodes whose children are a plain ordered list) and the child's id.
pub type LabeledChild = (Option<&'static str>, NodeId);

impl NodeKind {
    /// Whether this node is the opaque "don't descend" marker.
    pub fn is_wrapper(&self) -> bool {
        matches!(self, NodeKind::WrapperNode(_))
    }

    /// Whether this is a terminal (leaf) node with no children at all.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            NodeKind::Id(_)
                | NodeKind::StringLit(_)
                | NodeKind::NumberLit(_)
                | NodeKind::NoneLit
                | NodeKind::BoolLit(_)
                | NodeKind::OperatorLit(_)
                | NodeKind::EasterEggLit
                | NodeKind::WrapperNode(_)
        )
    }

    /// The human-readable role/class name used as the first line of a node's
    /// graph label (e.g. `"IfElse"`, `"Binary"`).
    pub fn role(&self) -> &'static str {
        match self {
            NodeKind::Root(_) => "Root",
            NodeKind::Block(_) => "BlockStatement",
            NodeKind::IfElse { .. } => "IfElse",
            NodeKind::While { .. } => "While",
            NodeKind::For { .. } => "For",
            NodeKind::Return(_) => "Return",
            NodeKind::Yield(_) => "Yield",
            NodeKind::Await(_) => "Await",
            NodeKind::Definition { .. } => "Definition",
            NodeKind::Binary { .. } => "Binary",
            NodeKind::Unary { .. } => "Unary",
            NodeKind::Conditional { .. } => "Conditional",
            NodeKind::Assignment { .. } => "Assignment",
            NodeKind::Invocation { .. } => "Invocation",
            NodeKind::Indexer { .. } => "Indexer",
            NodeKind::Slice { .. } => "Slice",
            NodeKind::MemberRef { .. } => "MemberRef",
            NodeKind::Lambda { .. } => "Lambda",
            NodeKind::Generator { .. } => "Generator",
            NodeKind::Collection(_) => "Collection",
            NodeKind::KeyValue { .. } => "KeyValue",
            NodeKind::Id(_) => "Id",
            NodeKind::StringLit(_) => "StringLit",
            NodeKind::NumberLit(_) => "NumberLit",
            NodeKind::NoneLit => "NoneLit",
            NodeKind::BoolLit(_) => "BoolLit",
            NodeKind::OperatorLit(_) => "OperatorLit",
            NodeKind::EasterEggLit => "EasterEggLit",
            NodeKind::WrapperNode(_) => "WrapperNode",
        }
    }

    /// The terminal's own text, for node kinds the emitter prints directly
    /// instead of `"<Role>\n\n<source text>"`. `WrapperNode` is the third
    /// such case, but it has no value of its own to return here — it prints
    /// its source-span text instead, which the emitter reads directly via
    /// [`NodeKind::is_wrapper`] since doing so needs the source string and a
    /// span, not just `&self`.
    pub fn terminal_value(&self) -> Option<&str> {
        match self {
            NodeKind::Id(v)
            | NodeKind::StringLit(v)
            | NodeKind::NumberLit(v)
            | NodeKind::BoolLit(v)
            | NodeKind::OperatorLit(v) => Some(v),
            NodeKind::NoneLit => Some("None"),
            NodeKind::EasterEggLit => Some("__peg_parser__"),
            _ => None,
        }
    }

    /// Every child of this node, in declaration order, with a field name
    /// when the variant gives one. Returns an empty vec for terminals and
    /// for `WrapperNode` (callers must check [`NodeKind::is_wrapper`]
    /// separately to decide whether to stop recursion there).
    pub fn labeled_children(&self) -> Vec<LabeledChild> {
        match self {
            NodeKind::Root(children) | NodeKind::Block(children) | NodeKind::Collection(children) => {
                children.iter().map(|&id| (None, id)).collect()
            }
            NodeKind::IfElse {
                condition,
                true_branch,
                false_branch,
            } => {
                let mut out = vec![
                    (Some("condition"), *condition),
                    (Some("true_branch"), *true_branch),
                ];
                if let Some(fb) = false_branch {
                    out.push((Some("false_branch"), *fb));
                }
                out
            }
            NodeKind::While { condition, body } => {
                vec![(Some("condition"), *condition), (Some("body"), *body)]
            }
            NodeKind::For { iterator, body } => {
                vec![(Some("iterator"), *iterator), (Some("body"), *body)]
            }
            NodeKind::Return(expr) | NodeKind::Yield(expr) | NodeKind::Await(expr) => {
                vec![(Some("expr"), *expr)]
            }
            NodeKind::Definition {
                name,
                signature,
                body,
            } => vec![
                (Some("name"), *name),
                (Some("signature"), *signature),
                (Some("body"), *body),
            ],
            NodeKind::Binary { left, op, right } => {
                vec![(Some("left"), *left), (Some("op"), *op), (Some("right"), *right)]
            }
            NodeKind::Unary { op, expr } => vec![(Some("op"), *op), (Some("expr"), *expr)],
            NodeKind::Conditional {
                condition,
                then_branch,
                else_branch,
            } => vec![
                (Some("condition"), *condition),
                (Some("then_branch"), *then_branch),
                (Some("else_branch"), *else_branch),
            ],
            NodeKind::Assignment {
                target,
                op,
                value,
                annotation,
            } => {
                let mut out = vec![(Some("target"), *target)];
                if let Some(op) = op {
                    out.push((Some("op"), *op));
                }
                out.push((Some("value"), *value));
                if let Some(ann) = annotation {
                    out.push((Some("annotation"), *ann));
                }
                out
            }
            NodeKind::Invocation { target, args } => {
                let mut out = vec![(Some("target"), *target)];
                out.extend(args.iter().map(|&id| (Some("args"), id)));
                out
            }
            NodeKind::Indexer { target, index } => {
                vec![(Some("target"), *target), (Some("index"), *index)]
            }
            NodeKind::Slice { start, stop, step } => {
                let mut out = Vec::new();
                if let Some(s) = start {
                    out.push((Some("start"), *s));
                }
                if let Some(s) = stop {
                    out.push((Some("stop"), *s));
                }
                if let Some(s) = step {
                    out.push((Some("step"), *s));
                }
                out
            }
            NodeKind::MemberRef { target, name } => {
                vec![(Some("target"), *target), (Some("name"), *name)]
            }
            NodeKind::Lambda { params, body } => {
                let mut out: Vec<_> = params.iter().map(|&id| (Some("params"), id)).collect();
                out.push((Some("body"), *body));
                out
            }
            NodeKind::Generator {
                expr,
                iterator,
                conditions,
            } => {
                let mut out = vec![(Some("expr"), *expr), (Some("iterator"), *iterator)];
                out.extend(conditions.iter().map(|&id| (Some("conditions"), id)));
                out
            }
            NodeKind::KeyValue { key, value } => {
                vec![(Some("key"), *key), (Some("value"), *value)]
            }
            NodeKind::Id(_)
            | NodeKind::StringLit(_)
            | NodeKind::NumberLit(_)
            | NodeKind::NoneLit
            | NodeKind::BoolLit(_)
            | NodeKind::OperatorLit(_)
            | NodeKind::EasterEggLit
            | NodeKind::WrapperNode(_) => Vec::new(),
        }
    }
}
