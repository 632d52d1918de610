//! Decompiled method trees.
//!
//! The decompiler (an external collaborator) hands over one [`DecompiledMethod`] per method
//! body: a variable table plus a statement tree. The transform pipeline in
//! [`crate::compiler`] rewrites that tree in place and finally wraps it into an emittable
//! [`Function`].
//!
//! Trees are owned by the translation of a single method and never shared across methods.
//!
//! # Key Components
//!
//! - [`Expr`] / [`Stmt`] / [`Block`] - The tree itself
//! - [`VariableTable`] - Locals, parameters and decompiler temporaries of one method
//! - [`MethodRef`] - The callee of a call expression
//! - [`Function`] - The emittable result of the pipeline
//!
//! # Usage Examples
//!
//! ```rust
//! use dotscript::ast::{DecompiledMethod, Expr, Stmt};
//! use dotscript::metadata::signatures::TypeSignature;
//!
//! let mut method = DecompiledMethod::new();
//! let x = method.variables.parameter("x", TypeSignature::I4);
//! method.parameters.push(x);
//! method.body.push(Stmt::Return(Some(Expr::Variable(x))));
//!
//! assert_eq!(method.to_string(), "return x;\n");
//! ```

mod display;
mod visit;

use std::fmt;

use crate::metadata::signatures::TypeSignature;

pub use visit::{walk_expr, walk_expr_mut};

/// Index of a variable in its method's [`VariableTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VariableId(u32);

impl VariableId {
    /// Position in the variable table.
    #[must_use]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for VariableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// A local, parameter or decompiler temporary.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    /// Display name; empty until named for temporaries
    pub name: String,
    /// Declared type
    pub ty: TypeSignature,
    /// Whether this is a method parameter
    pub is_parameter: bool,
    /// Whether the decompiler introduced it (stack slot, spill)
    pub is_generated: bool,
}

/// The variables of one method, addressed by [`VariableId`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VariableTable {
    variables: Vec<Variable>,
}

impl VariableTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a variable and returns its id.
    pub fn add(&mut self, variable: Variable) -> VariableId {
        let id = VariableId(u32::try_from(self.variables.len()).unwrap_or(u32::MAX));
        self.variables.push(variable);
        id
    }

    /// Adds a named parameter.
    pub fn parameter(&mut self, name: impl Into<String>, ty: TypeSignature) -> VariableId {
        self.add(Variable {
            name: name.into(),
            ty,
            is_parameter: true,
            is_generated: false,
        })
    }

    /// Adds a named local.
    pub fn local(&mut self, name: impl Into<String>, ty: TypeSignature) -> VariableId {
        self.add(Variable {
            name: name.into(),
            ty,
            is_parameter: false,
            is_generated: false,
        })
    }

    /// Adds an unnamed decompiler temporary.
    pub fn temporary(&mut self, ty: TypeSignature) -> VariableId {
        self.add(Variable {
            name: String::new(),
            ty,
            is_parameter: false,
            is_generated: true,
        })
    }

    /// Looks up a variable.
    #[must_use]
    pub fn get(&self, id: VariableId) -> Option<&Variable> {
        self.variables.get(id.index())
    }

    /// Looks up a variable for modification.
    pub fn get_mut(&mut self, id: VariableId) -> Option<&mut Variable> {
        self.variables.get_mut(id.index())
    }

    /// Display name of a variable, or its id if unnamed.
    #[must_use]
    pub fn name_of(&self, id: VariableId) -> String {
        match self.get(id) {
            Some(variable) if !variable.name.is_empty() => variable.name.clone(),
            _ => id.to_string(),
        }
    }

    /// Iterates all variables in table order.
    pub fn iter(&self) -> impl Iterator<Item = (VariableId, &Variable)> {
        self.variables
            .iter()
            .enumerate()
            .map(|(index, variable)| (VariableId(index as u32), variable))
    }

    /// Number of variables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.variables.len()
    }

    /// Returns `true` if the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}

/// A literal value.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// `null`
    Null,
    /// A boolean
    Bool(bool),
    /// An integer
    Int(i64),
    /// A floating point number
    Float(f64),
    /// A character
    Char(char),
    /// A string
    String(String),
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `%`
    Rem,
    /// `&`
    BitAnd,
    /// `|`
    BitOr,
    /// `^`
    BitXor,
    /// `<<`
    Shl,
    /// `>>`
    Shr,
    /// `==`
    Eq,
    /// `!=`
    Ne,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
    /// `&&`
    LogicalAnd,
    /// `||`
    LogicalOr,
}

impl BinaryOp {
    /// Operator token.
    #[must_use]
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
            BinaryOp::BitAnd => "&",
            BinaryOp::BitOr => "|",
            BinaryOp::BitXor => "^",
            BinaryOp::Shl => "<<",
            BinaryOp::Shr => ">>",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::LogicalAnd => "&&",
            BinaryOp::LogicalOr => "||",
        }
    }

    /// Returns `true` for operators producing a boolean.
    #[must_use]
    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            BinaryOp::Eq
                | BinaryOp::Ne
                | BinaryOp::Lt
                | BinaryOp::Le
                | BinaryOp::Gt
                | BinaryOp::Ge
                | BinaryOp::LogicalAnd
                | BinaryOp::LogicalOr
        )
    }

    /// Returns `true` for operators that have a compound assignment form (`+=`, `<<=`, ...).
    #[must_use]
    pub fn is_compoundable(self) -> bool {
        matches!(
            self,
            BinaryOp::Add
                | BinaryOp::Sub
                | BinaryOp::Mul
                | BinaryOp::Div
                | BinaryOp::Rem
                | BinaryOp::BitAnd
                | BinaryOp::BitOr
                | BinaryOp::BitXor
                | BinaryOp::Shl
                | BinaryOp::Shr
        )
    }

    /// Evaluation only conditionally reaches the right operand.
    #[must_use]
    pub fn is_short_circuit(self) -> bool {
        matches!(self, BinaryOp::LogicalAnd | BinaryOp::LogicalOr)
    }
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    /// `-x`
    Negate,
    /// `!x`
    Not,
    /// `~x`
    BitNot,
    /// `++x`
    PreIncrement,
    /// `--x`
    PreDecrement,
    /// `x++`
    PostIncrement,
    /// `x--`
    PostDecrement,
}

impl UnaryOp {
    /// Returns `true` for the increment/decrement family, which writes its operand.
    #[must_use]
    pub fn is_mutating(self) -> bool {
        matches!(
            self,
            UnaryOp::PreIncrement
                | UnaryOp::PreDecrement
                | UnaryOp::PostIncrement
                | UnaryOp::PostDecrement
        )
    }
}

/// The callee of a call expression.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodRef {
    /// Declaring type
    pub declaring: TypeSignature,
    /// Method name
    pub name: String,
    /// Return type
    pub return_type: TypeSignature,
    /// Parameter types
    pub params: Vec<TypeSignature>,
    /// Whether the callee is static
    pub is_static: bool,
}

impl MethodRef {
    /// Full name in `Ret Declaring::Name(P1,P2)` form.
    #[must_use]
    pub fn full_name(&self) -> String {
        let params: Vec<String> = self.params.iter().map(TypeSignature::full_name).collect();
        format!(
            "{} {}::{}({})",
            self.return_type.full_name(),
            self.declaring.full_name(),
            self.name,
            params.join(",")
        )
    }
}

/// An expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A literal
    Literal(Literal),
    /// A raw variable operand, as produced by the decompiler
    Variable(VariableId),
    /// A variable operand resolved against its declaration
    VariableRef(VariableId),
    /// The current instance
    This,
    /// A field access; static when `target` is absent
    Field {
        /// Instance the field is read from
        target: Option<Box<Expr>>,
        /// Declaring type
        owner: TypeSignature,
        /// Field name
        name: String,
        /// Field type
        ty: TypeSignature,
    },
    /// An array element access
    ArrayElement {
        /// The array
        array: Box<Expr>,
        /// The index
        index: Box<Expr>,
        /// Element type
        ty: TypeSignature,
    },
    /// A method call; static when `target` is absent
    Call {
        /// Receiver
        target: Option<Box<Expr>>,
        /// Callee
        method: MethodRef,
        /// Arguments
        args: Vec<Expr>,
    },
    /// An object creation
    New {
        /// Created type
        ty: TypeSignature,
        /// Constructor arguments
        args: Vec<Expr>,
    },
    /// A binary operation
    Binary {
        /// Operator
        op: BinaryOp,
        /// Left operand
        left: Box<Expr>,
        /// Right operand
        right: Box<Expr>,
    },
    /// A unary operation
    Unary {
        /// Operator
        op: UnaryOp,
        /// Operand
        operand: Box<Expr>,
    },
    /// An assignment, compound when `op` is present
    Assign {
        /// Compound operator
        op: Option<BinaryOp>,
        /// Assigned location
        target: Box<Expr>,
        /// Assigned value
        value: Box<Expr>,
    },
    /// `condition ? then : otherwise`
    Conditional {
        /// Condition
        condition: Box<Expr>,
        /// Value when true
        then: Box<Expr>,
        /// Value when false
        otherwise: Box<Expr>,
    },
    /// A by-value copy of a struct
    StructCopy(Box<Expr>),
    /// The default value of a type
    DefaultValue(TypeSignature),
    /// A type conversion
    Cast {
        /// Target type
        ty: TypeSignature,
        /// Converted value
        value: Box<Expr>,
    },
}

impl Expr {
    /// Integer literal.
    #[must_use]
    pub fn int(value: i64) -> Self {
        Expr::Literal(Literal::Int(value))
    }

    /// String literal.
    pub fn string(value: impl Into<String>) -> Self {
        Expr::Literal(Literal::String(value.into()))
    }

    /// Boolean literal.
    #[must_use]
    pub fn bool(value: bool) -> Self {
        Expr::Literal(Literal::Bool(value))
    }

    /// Plain assignment.
    #[must_use]
    pub fn assign(target: Expr, value: Expr) -> Self {
        Expr::Assign {
            op: None,
            target: Box::new(target),
            value: Box::new(value),
        }
    }

    /// Binary operation.
    #[must_use]
    pub fn binary(op: BinaryOp, left: Expr, right: Expr) -> Self {
        Expr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Unary operation.
    #[must_use]
    pub fn unary(op: UnaryOp, operand: Expr) -> Self {
        Expr::Unary {
            op,
            operand: Box::new(operand),
        }
    }

    /// Static field access.
    pub fn static_field(owner: TypeSignature, name: impl Into<String>, ty: TypeSignature) -> Self {
        Expr::Field {
            target: None,
            owner,
            name: name.into(),
            ty,
        }
    }

    /// Instance field access.
    pub fn field(
        target: Expr,
        owner: TypeSignature,
        name: impl Into<String>,
        ty: TypeSignature,
    ) -> Self {
        Expr::Field {
            target: Some(Box::new(target)),
            owner,
            name: name.into(),
            ty,
        }
    }

    /// Static call.
    #[must_use]
    pub fn call_static(method: MethodRef, args: Vec<Expr>) -> Self {
        Expr::Call {
            target: None,
            method,
            args,
        }
    }

    /// Instance call.
    #[must_use]
    pub fn call(target: Expr, method: MethodRef, args: Vec<Expr>) -> Self {
        Expr::Call {
            target: Some(Box::new(target)),
            method,
            args,
        }
    }

    /// The variable this expression names, raw or resolved.
    #[must_use]
    pub fn as_variable(&self) -> Option<VariableId> {
        match self {
            Expr::Variable(id) | Expr::VariableRef(id) => Some(*id),
            _ => None,
        }
    }

    /// Static type of the expression, where it can be told without the type graph.
    #[must_use]
    pub fn ty(&self, variables: &VariableTable) -> Option<TypeSignature> {
        match self {
            Expr::Literal(literal) => match literal {
                Literal::Null => None,
                Literal::Bool(_) => Some(TypeSignature::Boolean),
                Literal::Int(_) => Some(TypeSignature::I4),
                Literal::Float(_) => Some(TypeSignature::R8),
                Literal::Char(_) => Some(TypeSignature::Char),
                Literal::String(_) => Some(TypeSignature::String),
            },
            Expr::Variable(id) | Expr::VariableRef(id) => {
                variables.get(*id).map(|variable| variable.ty.clone())
            }
            Expr::This => None,
            Expr::Field { ty, .. }
            | Expr::ArrayElement { ty, .. }
            | Expr::New { ty, .. }
            | Expr::DefaultValue(ty)
            | Expr::Cast { ty, .. } => Some(ty.clone()),
            Expr::Call { method, .. } => match method.return_type {
                TypeSignature::Void => None,
                ref other => Some(other.clone()),
            },
            Expr::Binary { op, left, .. } => {
                if op.is_comparison() {
                    Some(TypeSignature::Boolean)
                } else {
                    left.ty(variables)
                }
            }
            Expr::Unary { op, operand } => match op {
                UnaryOp::Not => Some(TypeSignature::Boolean),
                _ => operand.ty(variables),
            },
            Expr::Assign { target, .. } => target.ty(variables),
            Expr::Conditional { then, .. } => then.ty(variables),
            Expr::StructCopy(inner) => inner.ty(variables),
        }
    }

    /// Returns `true` if evaluating this node (not its children) can write state.
    #[must_use]
    pub fn is_effectful_node(&self) -> bool {
        match self {
            Expr::Call { .. } | Expr::New { .. } | Expr::Assign { .. } => true,
            Expr::Unary { op, .. } => op.is_mutating(),
            _ => false,
        }
    }

    /// Returns `true` if the whole expression is free of writes.
    #[must_use]
    pub fn has_side_effects(&self) -> bool {
        let mut effectful = false;
        walk_expr(self, &mut |expr| effectful |= expr.is_effectful_node());
        effectful
    }

    /// Returns `true` for values that read no state at all and can move anywhere.
    #[must_use]
    pub fn is_constant(&self) -> bool {
        matches!(
            self,
            Expr::Literal(_) | Expr::DefaultValue(_) | Expr::This
        )
    }

    /// Direct children in evaluation order.
    #[must_use]
    pub fn children(&self) -> Vec<&Expr> {
        match self {
            Expr::Literal(_)
            | Expr::Variable(_)
            | Expr::VariableRef(_)
            | Expr::This
            | Expr::DefaultValue(_) => Vec::new(),
            Expr::Field { target, .. } => target.iter().map(|boxed| &**boxed).collect(),
            Expr::ArrayElement { array, index, .. } => vec![&**array, &**index],
            Expr::Call { target, args, .. } => target
                .iter()
                .map(|boxed| &**boxed)
                .chain(args.iter())
                .collect(),
            Expr::New { args, .. } => args.iter().collect(),
            Expr::Binary { left, right, .. } => vec![&**left, &**right],
            Expr::Unary { operand, .. } => vec![&**operand],
            Expr::Assign { target, value, .. } => vec![&**target, &**value],
            Expr::Conditional {
                condition,
                then,
                otherwise,
            } => vec![&**condition, &**then, &**otherwise],
            Expr::StructCopy(inner) => vec![&**inner],
            Expr::Cast { value, .. } => vec![&**value],
        }
    }

    /// Direct children in evaluation order, mutably.
    pub fn children_mut(&mut self) -> Vec<&mut Expr> {
        match self {
            Expr::Literal(_)
            | Expr::Variable(_)
            | Expr::VariableRef(_)
            | Expr::This
            | Expr::DefaultValue(_) => Vec::new(),
            Expr::Field { target, .. } => target.iter_mut().map(|boxed| &mut **boxed).collect(),
            Expr::ArrayElement { array, index, .. } => vec![&mut **array, &mut **index],
            Expr::Call { target, args, .. } => target
                .iter_mut()
                .map(|boxed| &mut **boxed)
                .chain(args.iter_mut())
                .collect(),
            Expr::New { args, .. } => args.iter_mut().collect(),
            Expr::Binary { left, right, .. } => vec![&mut **left, &mut **right],
            Expr::Unary { operand, .. } => vec![&mut **operand],
            Expr::Assign { target, value, .. } => vec![&mut **target, &mut **value],
            Expr::Conditional {
                condition,
                then,
                otherwise,
            } => vec![&mut **condition, &mut **then, &mut **otherwise],
            Expr::StructCopy(inner) => vec![&mut **inner],
            Expr::Cast { value, .. } => vec![&mut **value],
        }
    }
}

/// A statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// An expression evaluated for its effect
    Expr(Expr),
    /// A variable declaration with optional initializer
    Declare {
        /// Declared variable
        variable: VariableId,
        /// Initial value
        value: Option<Expr>,
    },
    /// A nested block
    Block(Block),
    /// A conditional
    If {
        /// Condition
        condition: Expr,
        /// Taken when true
        then: Block,
        /// Taken when false
        otherwise: Option<Block>,
    },
    /// A pre-tested loop
    While {
        /// Loop condition, evaluated before every iteration
        condition: Expr,
        /// Loop body
        body: Block,
    },
    /// A return, with value for non-void methods
    Return(Option<Expr>),
    /// `break`
    Break,
    /// `continue`
    Continue,
    /// `throw`
    Throw(Expr),
}

impl Stmt {
    /// Returns the variable if this is a plain `v = value;` statement.
    #[must_use]
    pub fn as_variable_assignment(&self) -> Option<(VariableId, &Expr)> {
        match self {
            Stmt::Expr(Expr::Assign {
                op: None,
                target,
                value,
            }) => target.as_variable().map(|id| (id, &**value)),
            _ => None,
        }
    }

    /// Expressions owned directly by this statement, in evaluation order.
    #[must_use]
    pub fn expressions(&self) -> Vec<&Expr> {
        match self {
            Stmt::Expr(expr) | Stmt::Throw(expr) => vec![expr],
            Stmt::Declare { value, .. } | Stmt::Return(value) => value.iter().collect(),
            Stmt::If { condition, .. } | Stmt::While { condition, .. } => vec![condition],
            Stmt::Block(_) | Stmt::Break | Stmt::Continue => Vec::new(),
        }
    }

    /// Expressions owned directly by this statement, mutably.
    pub fn expressions_mut(&mut self) -> Vec<&mut Expr> {
        match self {
            Stmt::Expr(expr) | Stmt::Throw(expr) => vec![expr],
            Stmt::Declare { value, .. } | Stmt::Return(value) => value.iter_mut().collect(),
            Stmt::If { condition, .. } | Stmt::While { condition, .. } => vec![condition],
            Stmt::Block(_) | Stmt::Break | Stmt::Continue => Vec::new(),
        }
    }

    /// Blocks nested directly in this statement.
    #[must_use]
    pub fn blocks(&self) -> Vec<&Block> {
        match self {
            Stmt::Block(block) | Stmt::While { body: block, .. } => vec![block],
            Stmt::If {
                then, otherwise, ..
            } => std::iter::once(then).chain(otherwise.iter()).collect(),
            _ => Vec::new(),
        }
    }

    /// Blocks nested directly in this statement, mutably.
    pub fn blocks_mut(&mut self) -> Vec<&mut Block> {
        match self {
            Stmt::Block(block) | Stmt::While { body: block, .. } => vec![block],
            Stmt::If {
                then, otherwise, ..
            } => std::iter::once(then).chain(otherwise.iter_mut()).collect(),
            _ => Vec::new(),
        }
    }
}

/// A sequence of statements.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Block {
    /// Statements in order
    pub statements: Vec<Stmt>,
}

impl Block {
    /// Creates an empty block.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a block from statements.
    #[must_use]
    pub fn of(statements: Vec<Stmt>) -> Self {
        Block { statements }
    }

    /// Appends a statement.
    pub fn push(&mut self, statement: Stmt) {
        self.statements.push(statement);
    }

    /// Returns `true` if the block has no statements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}

/// The decompiler's output for one method body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecompiledMethod {
    /// All variables of the method
    pub variables: VariableTable,
    /// Parameters in signature order
    pub parameters: Vec<VariableId>,
    /// The body
    pub body: Block,
}

impl DecompiledMethod {
    /// Creates an empty method.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rough IL size of the tree: one per expression node and per statement.
    #[must_use]
    pub fn estimated_instruction_count(&self) -> usize {
        let mut count = 0;
        visit::for_each_stmt(&self.body, &mut |stmt| {
            count += 1;
            for expr in stmt.expressions() {
                walk_expr(expr, &mut |_| count += 1);
            }
        });
        count
    }
}

/// The emittable result of the transform pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    /// Name of the function (the method name)
    pub name: String,
    /// Parameter names in order
    pub parameters: Vec<String>,
    /// Variables the body refers to
    pub variables: VariableTable,
    /// The transformed body
    pub body: Block,
}

pub(crate) use visit::{
    for_each_block_mut, for_each_expr, for_each_stmt, for_each_stmt_mut, rewrite_exprs,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expression_types() {
        let mut variables = VariableTable::new();
        let flag = variables.local("flag", TypeSignature::Boolean);
        let count = variables.local("count", TypeSignature::I4);

        let sum = Expr::binary(BinaryOp::Add, Expr::Variable(count), Expr::int(1));
        assert_eq!(sum.ty(&variables), Some(TypeSignature::I4));

        let cmp = Expr::binary(BinaryOp::Lt, Expr::Variable(count), Expr::int(1));
        assert_eq!(cmp.ty(&variables), Some(TypeSignature::Boolean));

        assert_eq!(
            Expr::Variable(flag).ty(&variables),
            Some(TypeSignature::Boolean)
        );
        assert_eq!(Expr::Literal(Literal::Null).ty(&variables), None);
    }

    #[test]
    fn test_side_effects() {
        let mut variables = VariableTable::new();
        let x = variables.local("x", TypeSignature::I4);

        let pure = Expr::binary(BinaryOp::Mul, Expr::Variable(x), Expr::int(2));
        assert!(!pure.has_side_effects());

        let bump = Expr::binary(
            BinaryOp::Add,
            Expr::int(1),
            Expr::unary(UnaryOp::PostIncrement, Expr::Variable(x)),
        );
        assert!(bump.has_side_effects());
        assert!(Expr::assign(Expr::Variable(x), Expr::int(0)).has_side_effects());
    }

    #[test]
    fn test_variable_assignment_detection() {
        let mut variables = VariableTable::new();
        let x = variables.temporary(TypeSignature::I4);

        let plain = Stmt::Expr(Expr::assign(Expr::Variable(x), Expr::int(3)));
        assert_eq!(plain.as_variable_assignment(), Some((x, &Expr::int(3))));

        let compound = Stmt::Expr(Expr::Assign {
            op: Some(BinaryOp::Add),
            target: Box::new(Expr::Variable(x)),
            value: Box::new(Expr::int(3)),
        });
        assert!(compound.as_variable_assignment().is_none());
    }

    #[test]
    fn test_instruction_estimate() {
        let mut method = DecompiledMethod::new();
        let x = method.variables.local("x", TypeSignature::I4);
        method
            .body
            .push(Stmt::Expr(Expr::assign(Expr::Variable(x), Expr::int(1))));
        method.body.push(Stmt::Return(None));

        // two statements, three expression nodes
        assert_eq!(method.estimated_instruction_count(), 5);
    }
}
