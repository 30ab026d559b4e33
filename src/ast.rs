use std::fmt;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefixOp {
    Not,
    Neg,
}

impl fmt::Display for PrefixOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PrefixOp::Not => "!",
            PrefixOp::Neg => "-",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfixOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
    Lt,
    Lte,
    Gt,
    Gte,
    Eq,
    NotEq,
}

impl fmt::Display for InfixOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            InfixOp::Add => "+",
            InfixOp::Sub => "-",
            InfixOp::Mul => "*",
            InfixOp::Div => "/",
            InfixOp::Mod => "%",
            InfixOp::Pow => "**",
            InfixOp::Lt => "<",
            InfixOp::Lte => "<=",
            InfixOp::Gt => ">",
            InfixOp::Gte => ">=",
            InfixOp::Eq => "==",
            InfixOp::NotEq => "!=",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub statements: Vec<Statement>,
}

/// A `{ ... }` statement sequence. `indent` is the nesting depth assigned by
/// the parser; it only affects pretty-printing (four spaces per level).
#[derive(Debug, Clone, PartialEq)]
pub struct BlockStatement {
    pub statements: Vec<Statement>,
    pub indent: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Assign { name: Rc<str>, value: Expression },
    Return { value: Option<Expression> },
    Expression(Expression),
    Block(BlockStatement),
    While { condition: Expression, body: BlockStatement },
    Break,
    Continue,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Identifier(Rc<str>),
    Integer(i64),
    String(Rc<str>),
    Boolean(bool),
    Prefix {
        operator: PrefixOp,
        right: Box<Expression>,
    },
    Infix {
        left: Box<Expression>,
        operator: InfixOp,
        right: Box<Expression>,
    },
    If {
        condition: Box<Expression>,
        consequence: BlockStatement,
        alternative: Option<BlockStatement>,
    },
    Function {
        parameters: Vec<Rc<str>>,
        body: BlockStatement,
    },
    Call {
        function: Box<Expression>,
        arguments: Vec<Expression>,
    },
    Array(Vec<Expression>),
    Index {
        left: Box<Expression>,
        index: Box<Expression>,
    },
    Map(Vec<(Expression, Expression)>),
    Macro {
        parameters: Vec<Rc<str>>,
        body: BlockStatement,
    },
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for statement in &self.statements {
            write!(f, "{statement}")?;
        }
        Ok(())
    }
}

impl fmt::Display for BlockStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{{")?;
        let padding = "    ".repeat(self.indent);
        for statement in &self.statements {
            writeln!(f, "{padding}{statement}")?;
        }
        write!(f, "{}}}", "    ".repeat(self.indent.saturating_sub(1)))
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statement::Assign { name, value } => write!(f, "{name} = {value};"),
            Statement::Return { value: Some(value) } => write!(f, "return {value};"),
            Statement::Return { value: None } => write!(f, "return;"),
            // An if-expression statement reads as a statement already; every
            // other expression statement gets a terminating semicolon.
            Statement::Expression(expression @ Expression::If { .. }) => {
                write!(f, "{expression}")
            }
            Statement::Expression(expression) => write!(f, "{expression};"),
            Statement::Block(block) => write!(f, "{block}"),
            Statement::While { condition, body } => write!(f, "while {condition} {body}"),
            Statement::Break => f.write_str("break;"),
            Statement::Continue => f.write_str("continue;"),
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Identifier(name) => f.write_str(name),
            Expression::Integer(value) => write!(f, "{value}"),
            Expression::String(value) => {
                f.write_str("\"")?;
                for ch in value.chars() {
                    match ch {
                        '"' => f.write_str("\\\"")?,
                        '\n' => f.write_str("\\n")?,
                        '\t' => f.write_str("\\t")?,
                        other => write!(f, "{other}")?,
                    }
                }
                f.write_str("\"")
            }
            Expression::Boolean(value) => write!(f, "{value}"),
            Expression::Prefix { operator, right } => write!(f, "({operator}{right})"),
            Expression::Infix {
                left,
                operator,
                right,
            } => write!(f, "({left} {operator} {right})"),
            Expression::If {
                condition,
                consequence,
                alternative,
            } => {
                write!(f, "if {condition} {consequence}")?;
                if let Some(alternative) = alternative {
                    write!(f, " else {alternative}")?;
                }
                Ok(())
            }
            Expression::Function { parameters, body } => {
                write!(f, "|{}| {body}", parameters.join(", "))
            }
            Expression::Call {
                function,
                arguments,
            } => {
                let arguments: Vec<String> = arguments.iter().map(|a| a.to_string()).collect();
                write!(f, "{function}({})", arguments.join(", "))
            }
            Expression::Array(elements) => {
                let elements: Vec<String> = elements.iter().map(|e| e.to_string()).collect();
                write!(f, "[{}]", elements.join(", "))
            }
            Expression::Index { left, index } => write!(f, "({left}[{index}])"),
            Expression::Map(pairs) => {
                let pairs: Vec<String> = pairs
                    .iter()
                    .map(|(key, value)| format!("{key}: {value}"))
                    .collect();
                write!(f, "{{{}}}", pairs.join(", "))
            }
            Expression::Macro { parameters, body } => {
                write!(f, "macro({}) {body}", parameters.join(", "))
            }
        }
    }
}

/// Rewrites every statement of a program bottom-up with `f` (applied to each
/// expression node after its children). The rewrite is fallible so callers
/// can evaluate while rewriting, as `unquote` and macro expansion do.
pub fn modify_program<F, E>(program: Program, f: &mut F) -> Result<Program, E>
where
    F: FnMut(Expression) -> Result<Expression, E>,
{
    let statements = program
        .statements
        .into_iter()
        .map(|statement| modify_statement(statement, f))
        .collect::<Result<_, E>>()?;
    Ok(Program { statements })
}

pub fn modify_statement<F, E>(statement: Statement, f: &mut F) -> Result<Statement, E>
where
    F: FnMut(Expression) -> Result<Expression, E>,
{
    Ok(match statement {
        Statement::Assign { name, value } => Statement::Assign {
            name,
            value: modify_expression(value, f)?,
        },
        Statement::Return { value } => Statement::Return {
            value: value.map(|value| modify_expression(value, f)).transpose()?,
        },
        Statement::Expression(expression) => {
            Statement::Expression(modify_expression(expression, f)?)
        }
        Statement::Block(block) => Statement::Block(modify_block(block, f)?),
        Statement::While { condition, body } => Statement::While {
            condition: modify_expression(condition, f)?,
            body: modify_block(body, f)?,
        },
        other @ (Statement::Break | Statement::Continue) => other,
    })
}

pub fn modify_block<F, E>(block: BlockStatement, f: &mut F) -> Result<BlockStatement, E>
where
    F: FnMut(Expression) -> Result<Expression, E>,
{
    let statements = block
        .statements
        .into_iter()
        .map(|statement| modify_statement(statement, f))
        .collect::<Result<_, E>>()?;
    Ok(BlockStatement {
        statements,
        indent: block.indent,
    })
}

pub fn modify_expression<F, E>(expression: Expression, f: &mut F) -> Result<Expression, E>
where
    F: FnMut(Expression) -> Result<Expression, E>,
{
    let expression = match expression {
        Expression::Prefix { operator, right } => Expression::Prefix {
            operator,
            right: Box::new(modify_expression(*right, f)?),
        },
        Expression::Infix {
            left,
            operator,
            right,
        } => Expression::Infix {
            left: Box::new(modify_expression(*left, f)?),
            operator,
            right: Box::new(modify_expression(*right, f)?),
        },
        Expression::If {
            condition,
            consequence,
            alternative,
        } => Expression::If {
            condition: Box::new(modify_expression(*condition, f)?),
            consequence: modify_block(consequence, f)?,
            alternative: alternative
                .map(|alternative| modify_block(alternative, f))
                .transpose()?,
        },
        Expression::Function { parameters, body } => Expression::Function {
            parameters,
            body: modify_block(body, f)?,
        },
        Expression::Call {
            function,
            arguments,
        } => Expression::Call {
            function: Box::new(modify_expression(*function, f)?),
            arguments: arguments
                .into_iter()
                .map(|argument| modify_expression(argument, f))
                .collect::<Result<_, E>>()?,
        },
        Expression::Array(elements) => Expression::Array(
            elements
                .into_iter()
                .map(|element| modify_expression(element, f))
                .collect::<Result<_, E>>()?,
        ),
        Expression::Index { left, index } => Expression::Index {
            left: Box::new(modify_expression(*left, f)?),
            index: Box::new(modify_expression(*index, f)?),
        },
        // Keys may be rewritten, so the pair collection is rebuilt.
        Expression::Map(pairs) => Expression::Map(
            pairs
                .into_iter()
                .map(|(key, value)| Ok((modify_expression(key, f)?, modify_expression(value, f)?)))
                .collect::<Result<_, E>>()?,
        ),
        leaf @ (Expression::Identifier(_)
        | Expression::Integer(_)
        | Expression::String(_)
        | Expression::Boolean(_)
        | Expression::Macro { .. }) => leaf,
    };
    f(expression)
}
