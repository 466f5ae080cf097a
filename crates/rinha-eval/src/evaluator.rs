//! Core term evaluator.

use crate::env::Environment;
use crate::error::{EvalResult, RuntimeError};
use crate::operators;
use crate::options::EvalOptions;
use crate::output::OutputSink;
use crate::stack::ensure_sufficient_stack;
use crate::value::{Closure, Value};
use rinha_types::ast::*;
use rinha_types::Location;
use tracing::{debug, trace, warn};

/// The tree-walking evaluator. Walks terms and produces Values.
///
/// One evaluator serves one run: the call depth and step counters are not
/// reset between calls to [`Evaluator::evaluate`].
pub struct Evaluator<'s> {
    /// Destination of `print`.
    sink: &'s mut dyn OutputSink,
    options: EvalOptions,
    /// Number of calls currently active.
    depth: usize,
    /// Number of terms evaluated so far.
    steps: u64,
}

impl<'s> Evaluator<'s> {
    pub fn new(sink: &'s mut dyn OutputSink, options: EvalOptions) -> Self {
        Self {
            sink,
            options,
            depth: 0,
            steps: 0,
        }
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Consume one step. Fails once the step budget, if any, is exhausted.
    fn tick(&mut self, location: &Location) -> EvalResult<()> {
        self.steps += 1;
        match self.options.max_steps {
            Some(limit) if self.steps > limit => {
                warn!(limit, %location, "step limit exceeded");
                Err(RuntimeError::StepLimitExceeded {
                    limit,
                    location: location.clone(),
                })
            }
            _ => Ok(()),
        }
    }

    // ══════════════════════════════════════════════════════════════════════
    // Term evaluation
    // ══════════════════════════════════════════════════════════════════════

    /// Evaluate a term in `env`.
    pub fn evaluate<'ast>(
        &mut self,
        term: &'ast Term,
        env: &Environment<'ast>,
    ) -> EvalResult<Value<'ast>> {
        ensure_sufficient_stack(|| self.eval_term(term, env))
    }

    fn eval_term<'ast>(
        &mut self,
        mut term: &'ast Term,
        env: &Environment<'ast>,
    ) -> EvalResult<Value<'ast>> {
        let mut env = env.clone();
        // `let` bodies and `if` branches continue in this loop instead of
        // recursing, so long chains of either use no extra stack.
        loop {
            self.tick(term.location())?;
            match term {
                Term::Int(int) => return Ok(Value::Int(int.value)),
                Term::Str(text) => return Ok(Value::text(text.value.as_str())),
                Term::Bool(boolean) => return Ok(Value::Bool(boolean.value)),
                Term::Var(var) => return env.lookup(&var.text, &var.location),
                Term::Function(function) => {
                    return Ok(Value::Closure(Closure::new(function, env)));
                }
                Term::Let(let_) => {
                    env = self.eval_let(let_, &env)?;
                    term = let_.next.as_ref();
                }
                Term::If(if_) => {
                    term = if self.eval_condition(&if_.condition, &env)? {
                        if_.then.as_ref()
                    } else {
                        if_.otherwise.as_ref()
                    };
                }
                Term::Binary(binary) => return self.eval_binary(binary, &env),
                Term::Call(call) => return self.eval_call(call, &env),
                Term::Print(print) => return self.eval_print(print, &env),
                Term::Tuple(tuple) => {
                    let first = self.evaluate(&tuple.first, &env)?;
                    let second = self.evaluate(&tuple.second, &env)?;
                    return Ok(Value::tuple(first, second));
                }
                Term::First(projection) => return self.eval_projection(projection, &env, false),
                Term::Second(projection) => return self.eval_projection(projection, &env, true),
                Term::Malformed(malformed) => {
                    return Err(RuntimeError::Syntax {
                        message: malformed.message.clone(),
                        full_text: malformed.full_text.clone(),
                        location: malformed.location.clone(),
                    });
                }
            }
        }
    }

    /// Bind a `let` and return the scope its body runs in.
    ///
    /// A function literal is bound recursively so its body can call itself
    /// by the bound name.
    fn eval_let<'ast>(
        &mut self,
        let_: &'ast Let,
        env: &Environment<'ast>,
    ) -> EvalResult<Environment<'ast>> {
        let name = let_.name.text.as_str();
        match let_.value.as_ref() {
            Term::Function(function) => {
                self.tick(&function.location)?;
                Ok(env.bind_recursive(name, |scope| {
                    Value::Closure(Closure::new(function, scope.clone()))
                }))
            }
            value => {
                let value = self.evaluate(value, env)?;
                Ok(env.bind(name, value))
            }
        }
    }

    fn eval_condition<'ast>(
        &mut self,
        condition: &'ast Term,
        env: &Environment<'ast>,
    ) -> EvalResult<bool> {
        match self.evaluate(condition, env)? {
            Value::Bool(b) => Ok(b),
            other => Err(RuntimeError::type_mismatch(
                "boolean",
                other.type_name(),
                condition.location(),
            )),
        }
    }

    fn eval_binary<'ast>(
        &mut self,
        binary: &'ast Binary,
        env: &Environment<'ast>,
    ) -> EvalResult<Value<'ast>> {
        if binary.op.is_short_circuit() {
            let lhs = self.eval_logical_operand(&binary.lhs, env, &binary.location)?;
            // `false && _` and `true || _` are decided by the left side.
            let decided = match binary.op {
                BinaryOp::And => !lhs,
                _ => lhs,
            };
            if decided {
                return Ok(Value::Bool(lhs));
            }
            return self
                .eval_logical_operand(&binary.rhs, env, &binary.location)
                .map(Value::Bool);
        }

        let lhs = self.evaluate(&binary.lhs, env)?;
        let rhs = self.evaluate(&binary.rhs, env)?;
        operators::apply_binary(binary.op, &lhs, &rhs, &self.options, &binary.location)
    }

    fn eval_logical_operand<'ast>(
        &mut self,
        operand: &'ast Term,
        env: &Environment<'ast>,
        location: &Location,
    ) -> EvalResult<bool> {
        match self.evaluate(operand, env)? {
            Value::Bool(b) => Ok(b),
            other => Err(RuntimeError::type_mismatch(
                "boolean",
                other.type_name(),
                location,
            )),
        }
    }

    fn eval_call<'ast>(
        &mut self,
        call: &'ast Call,
        env: &Environment<'ast>,
    ) -> EvalResult<Value<'ast>> {
        let closure = match self.evaluate(&call.callee, env)? {
            Value::Closure(closure) => closure,
            other => {
                return Err(RuntimeError::type_mismatch(
                    "callable",
                    other.type_name(),
                    &call.location,
                ));
            }
        };

        let arguments = call
            .arguments
            .iter()
            .map(|argument| self.evaluate(argument, env))
            .collect::<EvalResult<Vec<_>>>()?;

        if arguments.len() != closure.arity() {
            return Err(RuntimeError::ArityMismatch {
                expected: closure.arity(),
                got: arguments.len(),
                location: call.location.clone(),
            });
        }

        if self.depth >= self.options.max_depth {
            warn!(
                limit = self.options.max_depth,
                location = %call.location,
                "recursion limit exceeded"
            );
            return Err(RuntimeError::RecursionLimitExceeded {
                limit: self.options.max_depth,
                location: call.location.clone(),
            });
        }

        let scope = closure.env().bind_all(closure.parameters().zip(arguments));
        self.depth += 1;
        trace!(
            depth = self.depth,
            arity = closure.arity(),
            location = %call.location,
            "call"
        );
        let result = self.evaluate(closure.body(), &scope);
        self.depth -= 1;
        result
    }

    fn eval_print<'ast>(
        &mut self,
        print: &'ast Print,
        env: &Environment<'ast>,
    ) -> EvalResult<Value<'ast>> {
        let value = self.evaluate(&print.value, env)?;
        self.sink
            .write_line(&value.to_string())
            .map_err(|source| RuntimeError::Output {
                source,
                location: print.location.clone(),
            })?;
        Ok(value)
    }

    fn eval_projection<'ast>(
        &mut self,
        projection: &'ast Projection,
        env: &Environment<'ast>,
        second: bool,
    ) -> EvalResult<Value<'ast>> {
        match self.evaluate(&projection.value, env)? {
            Value::Tuple(pair) if second => Ok(pair.1.clone()),
            Value::Tuple(pair) => Ok(pair.0.clone()),
            other => Err(RuntimeError::type_mismatch(
                "tuple",
                other.type_name(),
                &projection.location,
            )),
        }
    }
}

/// Evaluate `term` in `env` with default options.
pub fn evaluate<'ast>(
    term: &'ast Term,
    env: &Environment<'ast>,
    sink: &mut dyn OutputSink,
) -> EvalResult<Value<'ast>> {
    Evaluator::new(sink, EvalOptions::default()).evaluate(term, env)
}

/// Evaluate a loaded program in an empty environment.
pub fn run_file<'ast>(
    file: &'ast File,
    sink: &mut dyn OutputSink,
    options: EvalOptions,
) -> EvalResult<Value<'ast>> {
    debug!(file = %file.name, ?options, "evaluating");
    let mut evaluator = Evaluator::new(sink, options);
    let result = evaluator.evaluate(&file.expression, &Environment::new());
    match &result {
        Ok(_) => debug!(steps = evaluator.steps(), "evaluation finished"),
        Err(err) => debug!(
            steps = evaluator.steps(),
            kind = %err.kind(),
            "evaluation failed"
        ),
    }
    result
}
