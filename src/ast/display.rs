//! Compact text rendering of trees.
//!
//! The rendering is a debugging aid and the body text of the textual declaration sink. It is
//! not the target-language formatter, which stays an external collaborator.

use std::fmt::{self, Write};

use crate::ast::{
    Block, DecompiledMethod, Expr, Function, Literal, Stmt, UnaryOp, VariableId, VariableTable,
};

struct Printer<'a> {
    variables: Option<&'a VariableTable>,
}

impl Printer<'_> {
    fn variable(&self, id: VariableId) -> String {
        match self.variables {
            Some(table) => table.name_of(id),
            None => id.to_string(),
        }
    }

    fn expr(&self, out: &mut impl Write, expr: &Expr) -> fmt::Result {
        match expr {
            Expr::Literal(literal) => match literal {
                Literal::Null => write!(out, "null"),
                Literal::Bool(value) => write!(out, "{value}"),
                Literal::Int(value) => write!(out, "{value}"),
                Literal::Float(value) => write!(out, "{value:?}"),
                Literal::Char(value) => write!(out, "{value:?}"),
                Literal::String(value) => write!(out, "{value:?}"),
            },
            Expr::Variable(id) | Expr::VariableRef(id) => write!(out, "{}", self.variable(*id)),
            Expr::This => write!(out, "this"),
            Expr::Field {
                target,
                owner,
                name,
                ..
            } => {
                match target {
                    Some(target) => self.expr(out, target)?,
                    None => write!(out, "{owner}")?,
                }
                write!(out, ".{name}")
            }
            Expr::ArrayElement { array, index, .. } => {
                self.expr(out, array)?;
                write!(out, "[")?;
                self.expr(out, index)?;
                write!(out, "]")
            }
            Expr::Call {
                target,
                method,
                args,
            } => {
                match target {
                    Some(target) => self.expr(out, target)?,
                    None => write!(out, "{}", method.declaring)?,
                }
                write!(out, ".{}(", method.name)?;
                self.list(out, args)?;
                write!(out, ")")
            }
            Expr::New { ty, args } => {
                write!(out, "new {ty}(")?;
                self.list(out, args)?;
                write!(out, ")")
            }
            Expr::Binary { op, left, right } => {
                write!(out, "(")?;
                self.expr(out, left)?;
                write!(out, " {} ", op.symbol())?;
                self.expr(out, right)?;
                write!(out, ")")
            }
            Expr::Unary { op, operand } => {
                let (prefix, suffix) = match op {
                    UnaryOp::Negate => ("-", ""),
                    UnaryOp::Not => ("!", ""),
                    UnaryOp::BitNot => ("~", ""),
                    UnaryOp::PreIncrement => ("++", ""),
                    UnaryOp::PreDecrement => ("--", ""),
                    UnaryOp::PostIncrement => ("", "++"),
                    UnaryOp::PostDecrement => ("", "--"),
                };
                write!(out, "{prefix}")?;
                self.expr(out, operand)?;
                write!(out, "{suffix}")
            }
            Expr::Assign { op, target, value } => {
                self.expr(out, target)?;
                match op {
                    Some(op) => write!(out, " {}= ", op.symbol())?,
                    None => write!(out, " = ")?,
                }
                self.expr(out, value)
            }
            Expr::Conditional {
                condition,
                then,
                otherwise,
            } => {
                write!(out, "(")?;
                self.expr(out, condition)?;
                write!(out, " ? ")?;
                self.expr(out, then)?;
                write!(out, " : ")?;
                self.expr(out, otherwise)?;
                write!(out, ")")
            }
            Expr::StructCopy(inner) => {
                self.expr(out, inner)?;
                write!(out, ".MemberwiseClone()")
            }
            Expr::DefaultValue(ty) => write!(out, "default({ty})"),
            Expr::Cast { ty, value } => {
                write!(out, "({ty})")?;
                self.expr(out, value)
            }
        }
    }

    fn list(&self, out: &mut impl Write, exprs: &[Expr]) -> fmt::Result {
        for (index, expr) in exprs.iter().enumerate() {
            if index > 0 {
                write!(out, ", ")?;
            }
            self.expr(out, expr)?;
        }
        Ok(())
    }

    fn block(&self, out: &mut impl Write, block: &Block, depth: usize) -> fmt::Result {
        for stmt in &block.statements {
            self.stmt(out, stmt, depth)?;
        }
        Ok(())
    }

    fn stmt(&self, out: &mut impl Write, stmt: &Stmt, depth: usize) -> fmt::Result {
        let indent = "  ".repeat(depth);
        write!(out, "{indent}")?;

        match stmt {
            Stmt::Expr(expr) => {
                self.expr(out, expr)?;
                writeln!(out, ";")
            }
            Stmt::Declare { variable, value } => {
                write!(out, "var {}", self.variable(*variable))?;
                if let Some(value) = value {
                    write!(out, " = ")?;
                    self.expr(out, value)?;
                }
                writeln!(out, ";")
            }
            Stmt::Block(block) => {
                writeln!(out, "{{")?;
                self.block(out, block, depth + 1)?;
                writeln!(out, "{indent}}}")
            }
            Stmt::If {
                condition,
                then,
                otherwise,
            } => {
                write!(out, "if (")?;
                self.expr(out, condition)?;
                writeln!(out, ") {{")?;
                self.block(out, then, depth + 1)?;
                if let Some(otherwise) = otherwise {
                    writeln!(out, "{indent}}} else {{")?;
                    self.block(out, otherwise, depth + 1)?;
                }
                writeln!(out, "{indent}}}")
            }
            Stmt::While { condition, body } => {
                write!(out, "while (")?;
                self.expr(out, condition)?;
                writeln!(out, ") {{")?;
                self.block(out, body, depth + 1)?;
                writeln!(out, "{indent}}}")
            }
            Stmt::Return(value) => {
                write!(out, "return")?;
                if let Some(value) = value {
                    write!(out, " ")?;
                    self.expr(out, value)?;
                }
                writeln!(out, ";")
            }
            Stmt::Break => writeln!(out, "break;"),
            Stmt::Continue => writeln!(out, "continue;"),
            Stmt::Throw(value) => {
                write!(out, "throw ")?;
                self.expr(out, value)?;
                writeln!(out, ";")
            }
        }
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Printer { variables: None }.block(f, self, 0)
    }
}

impl fmt::Display for DecompiledMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Printer {
            variables: Some(&self.variables),
        }
        .block(f, &self.body, 0)
    }
}

impl Function {
    /// Renders the body only, with resolved variable names.
    #[must_use]
    pub fn body_text(&self) -> String {
        let mut text = String::new();
        let printer = Printer {
            variables: Some(&self.variables),
        };
        // writing into a String cannot fail
        let _ = printer.block(&mut text, &self.body, 1);
        text
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "function {}({}) {{", self.name, self.parameters.join(", "))?;
        write!(f, "{}", self.body_text())?;
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::{BinaryOp, Block, Expr, Function, Stmt, VariableTable};
    use crate::metadata::signatures::TypeSignature;

    #[test]
    fn test_function_rendering() {
        let mut variables = VariableTable::new();
        let a = variables.parameter("a", TypeSignature::I4);
        let sum = variables.local("sum", TypeSignature::I4);

        let function = Function {
            name: "Add".to_string(),
            parameters: vec!["a".to_string()],
            variables,
            body: Block::of(vec![
                Stmt::Declare {
                    variable: sum,
                    value: Some(Expr::binary(BinaryOp::Add, Expr::VariableRef(a), Expr::int(1))),
                },
                Stmt::Return(Some(Expr::VariableRef(sum))),
            ]),
        };

        assert_eq!(
            function.to_string(),
            "function Add(a) {\n  var sum = (a + 1);\n  return sum;\n}"
        );
    }

    #[test]
    fn test_block_without_names() {
        let mut variables = VariableTable::new();
        let t = variables.temporary(TypeSignature::I4);
        let block = Block::of(vec![Stmt::Expr(Expr::assign(Expr::Variable(t), Expr::int(0)))]);
        assert_eq!(block.to_string(), "v0 = 0;\n");
    }
}
