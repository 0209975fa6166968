// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! The binder: syntax trees in, typed bound trees out.
//!
//! Binding is two-phase. Every expression first gets its *self-determined*
//! type, computed bottom-up from its subexpressions alone; the binder then
//! propagates types top-down ([`Expression::propagate_type`]), widening
//! operands when an enclosing operator or assignment target is wider. An
//! operand's width can therefore grow because of context it cannot see.
//!
//! Errors never cross frames: each bind entry point returns an `Invalid`
//! node (or an error-typed operator node) and records a diagnostic, so the
//! caller can keep traversing.

use std::rc::Rc;

use super::bound::{BoundSelector, Expression, Statement};
use super::symbol::{LookupHint, Scope, SymbolKind};
use super::types::{TypeSymbol, Types};
use super::Compilation;
use crate::diagnostics::DiagCode;
use crate::source_analysis::Span;
use crate::syntax::{
    AssignmentOperator, BinaryOperator, BinaryOperatorClass, ExpressionSyntax, Identifier,
    SelectorSyntax, StatementSyntax, UnaryOperator,
};

/// Binds expressions and statements against one scope.
///
/// Binders are cheap: scoped-name resolution and nested statement binding
/// construct fresh binders for the inner scopes.
pub struct Binder<'a> {
    scope: Rc<Scope>,
    compilation: &'a Compilation,
}

impl<'a> Binder<'a> {
    /// Creates a binder for the given scope.
    #[must_use]
    pub fn new(compilation: &'a Compilation, scope: Rc<Scope>) -> Self {
        Self { scope, compilation }
    }

    fn types(&self) -> &Types {
        self.compilation.types()
    }

    // ========================================================================
    // Expression entry points
    // ========================================================================

    /// Binds an expression that must be constant at bind time. Currently
    /// binds-and-propagates exactly like self-determined binding; callers
    /// evaluate the result and diagnose non-constants.
    #[must_use]
    pub fn bind_constant_expression(&self, syntax: &ExpressionSyntax) -> Expression {
        self.bind_and_propagate(syntax)
    }

    /// Binds an expression in a self-determined context.
    #[must_use]
    pub fn bind_self_determined_expression(&self, syntax: &ExpressionSyntax) -> Expression {
        self.bind_and_propagate(syntax)
    }

    /// Binds an expression in an assignment-like context: the target type
    /// checks compatibility and then propagates into the expression,
    /// widening it when the target is wider.
    #[must_use]
    pub fn bind_assignment_like_context(
        &self,
        syntax: &ExpressionSyntax,
        location: Span,
        assignment_type: &Rc<TypeSymbol>,
    ) -> Expression {
        let mut expr = self.bind_and_propagate(syntax);
        if expr.bad() {
            return expr;
        }

        let ty = Rc::clone(expr.ty());
        if !assignment_type.is_assignment_compatible(&ty) {
            let code = if assignment_type.is_cast_compatible(&ty) {
                DiagCode::NoImplicitConversion(
                    ty.to_string().into(),
                    assignment_type.to_string().into(),
                )
            } else {
                DiagCode::BadAssignment(ty.to_string().into(), assignment_type.to_string().into())
            };
            self.compilation.add_error(code, location);
            return self.bad_expr(Some(expr), location);
        }

        if !self.propagate_assignment_like(&mut expr, assignment_type) {
            let own = Rc::clone(expr.ty());
            expr.propagate_type(&own, self.types());
        }
        expr
    }

    /// Binds an expression and pushes its own self-determined type down into
    /// its operands.
    fn bind_and_propagate(&self, syntax: &ExpressionSyntax) -> Expression {
        let mut expr = self.bind_expression(syntax);
        let own = Rc::clone(expr.ty());
        expr.propagate_type(&own, self.types());
        expr
    }

    fn bind_expression(&self, syntax: &ExpressionSyntax) -> Expression {
        match syntax {
            ExpressionSyntax::IntegerLiteral { value, span } => Expression::IntegerLiteral {
                ty: self.compilation.get_int_type(),
                value: value.clone(),
                span: *span,
            },
            ExpressionSyntax::RealLiteral { value, span } => Expression::RealLiteral {
                ty: self.compilation.get_real_type(),
                value: *value,
                span: *span,
            },
            ExpressionSyntax::IntegerVectorLiteral { value, span } => Expression::IntegerLiteral {
                ty: self.compilation.get_type(
                    value.width(),
                    value.is_signed(),
                    value.has_unknown(),
                ),
                value: value.clone(),
                span: *span,
            },
            ExpressionSyntax::UnbasedUnsizedLiteral { bit, span } => {
                // Width 1 in an undetermined context, but grows from above.
                Expression::UnbasedUnsizedLiteral {
                    ty: self.compilation.get_type(1, false, bit.is_unknown()),
                    bit: *bit,
                    span: *span,
                }
            }
            ExpressionSyntax::Parenthesized { inner, .. } => self.bind_expression(inner),
            ExpressionSyntax::IdentifierName(identifier) => self.bind_simple_name(identifier),
            ExpressionSyntax::ScopedName {
                package,
                name,
                span,
            } => self.bind_scoped_name(package, name, *span),
            ExpressionSyntax::Unary {
                op,
                operand,
                op_span,
                span,
            } => self.bind_unary_operator(*op, operand, *op_span, *span),
            ExpressionSyntax::Binary {
                op,
                left,
                right,
                op_span,
                span,
            } => self.bind_binary_operator(*op, left, right, *op_span, *span),
            ExpressionSyntax::Assignment {
                op,
                left,
                right,
                op_span,
                span,
            } => self.bind_assignment_operator(*op, left, right, *op_span, *span),
            ExpressionSyntax::Conditional {
                predicate,
                left,
                right,
                span,
            } => self.bind_conditional_expression(predicate, left, right, *span),
            ExpressionSyntax::Concatenation { operands, span } => {
                self.bind_concatenation_expression(operands, *span)
            }
            ExpressionSyntax::Replication {
                count,
                concat,
                span,
            } => self.bind_replication_expression(count, concat, *span),
            ExpressionSyntax::ElementSelect {
                value,
                selector,
                span,
            } => self.bind_select_expression(value, selector, *span),
            ExpressionSyntax::Call {
                target,
                arguments,
                span,
            } => self.bind_subroutine_call(target, arguments, *span),
        }
    }

    // ========================================================================
    // Names
    // ========================================================================

    fn bind_simple_name(&self, identifier: &Identifier) -> Expression {
        let result = self.scope.lookup(&identifier.name, LookupHint::Any);
        let Some(symbol) = result.found_symbol() else {
            self.compilation.add_error(
                DiagCode::UndeclaredIdentifier(identifier.name.clone()),
                identifier.span,
            );
            return self.bad_expr(None, identifier.span);
        };

        match &symbol.kind {
            SymbolKind::Variable { ty } | SymbolKind::FormalArgument { ty } => {
                Expression::VariableRef {
                    ty: Rc::clone(ty),
                    symbol: Rc::clone(symbol),
                    span: identifier.span,
                }
            }
            SymbolKind::Parameter { ty, .. } => Expression::ParameterRef {
                ty: Rc::clone(ty),
                symbol: Rc::clone(symbol),
                span: identifier.span,
            },
            // The parser only places value names in expression position.
            _ => unreachable!("non-value symbol '{}' in expression position", symbol.name),
        }
    }

    /// Binds `package::name`. Only the package-qualified form is supported;
    /// the name is rebound by a fresh binder inside the package's scope.
    fn bind_scoped_name(&self, package: &Identifier, name: &Identifier, span: Span) -> Expression {
        if package.name.is_empty() {
            return self.bad_expr(None, span);
        }
        let root = self.scope.root();
        let Some(package_symbol) = root.find_package(&package.name) else {
            self.compilation.add_error(
                DiagCode::UndeclaredIdentifier(package.name.clone()),
                package.span,
            );
            return self.bad_expr(None, span);
        };
        let package_scope = package_symbol
            .scope()
            .expect("package symbols always own a scope");
        Binder::new(self.compilation, Rc::clone(package_scope)).bind_simple_name(name)
    }

    // ========================================================================
    // Operators
    // ========================================================================

    fn bind_unary_operator(
        &self,
        op: UnaryOperator,
        operand_syntax: &ExpressionSyntax,
        op_span: Span,
        span: Span,
    ) -> Expression {
        let operand = self.bind_and_propagate(operand_syntax);
        if !self.check_unary_applicability(op, op_span, &operand) {
            return Expression::Unary {
                ty: self.compilation.get_error_type(),
                op,
                operand: Box::new(operand),
                span,
            };
        }

        // Arithmetic unaries keep the operand's type; reductions and logical
        // not produce a single logic bit.
        let ty = if op.is_arithmetic() {
            Rc::clone(operand.ty())
        } else {
            self.compilation.get_logic_type()
        };
        Expression::Unary {
            ty,
            op,
            operand: Box::new(operand),
            span,
        }
    }

    fn bind_binary_operator(
        &self,
        op: BinaryOperator,
        left_syntax: &ExpressionSyntax,
        right_syntax: &ExpressionSyntax,
        op_span: Span,
        span: Span,
    ) -> Expression {
        let mut left = self.bind_and_propagate(left_syntax);
        let mut right = self.bind_and_propagate(right_syntax);
        if !self.check_binary_applicability(op, op_span, &left, &right) {
            return Expression::Binary {
                ty: self.compilation.get_error_type(),
                op,
                left: Box::new(left),
                right: Box::new(right),
                span,
            };
        }

        let ty = match op.class() {
            BinaryOperatorClass::Arithmetic => {
                // Division can produce X bits out of two-state inputs.
                self.binary_operator_result_type(
                    left.ty(),
                    right.ty(),
                    op == BinaryOperator::Divide,
                )
            }
            BinaryOperatorClass::Comparison => self.compilation.get_logic_type(),
            BinaryOperatorClass::Logical => {
                // The operands size each other; the result is one bit and
                // propagation from above never reaches the operands.
                let left_ty = Rc::clone(left.ty());
                let right_ty = Rc::clone(right.ty());
                if !self.propagate_assignment_like(&mut right, &left_ty) {
                    self.propagate_assignment_like(&mut left, &right_ty);
                }
                self.compilation.get_logic_type()
            }
            BinaryOperatorClass::ShiftOrPower => {
                // The right operand is self-determined; only the left width
                // sizes the result. Power can divide by zero into X bits.
                self.shift_or_power_result_type(
                    left.ty(),
                    right.ty(),
                    op == BinaryOperator::Power,
                )
            }
        };
        Expression::Binary {
            ty,
            op,
            left: Box::new(left),
            right: Box::new(right),
            span,
        }
    }

    fn bind_assignment_operator(
        &self,
        op: AssignmentOperator,
        left_syntax: &ExpressionSyntax,
        right_syntax: &ExpressionSyntax,
        op_span: Span,
        span: Span,
    ) -> Expression {
        let left = self.bind_and_propagate(left_syntax);
        let mut right = self.bind_and_propagate(right_syntax);

        // Basic assignment is always applicable; compound assignments are
        // applicable iff their underlying binary operator is.
        let applicable = match op.binary_operator() {
            None => !left.bad() && !right.bad(),
            Some(binary_op) => self.check_binary_applicability(binary_op, op_span, &left, &right),
        };
        if !applicable {
            return Expression::Assignment {
                ty: self.compilation.get_error_type(),
                op,
                left: Box::new(left),
                right: Box::new(right),
                span,
            };
        }

        // Operands are self-determined, but the right side grows to the left
        // side's width and the result is always the left side's type.
        let left_ty = Rc::clone(left.ty());
        self.propagate_assignment_like(&mut right, &left_ty);
        Expression::Assignment {
            ty: left_ty,
            op,
            left: Box::new(left),
            right: Box::new(right),
            span,
        }
    }

    fn bind_conditional_expression(
        &self,
        predicate_syntax: &ExpressionSyntax,
        left_syntax: &ExpressionSyntax,
        right_syntax: &ExpressionSyntax,
        span: Span,
    ) -> Expression {
        let predicate = self.bind_and_propagate(predicate_syntax);
        let left = self.bind_and_propagate(left_syntax);
        let right = self.bind_and_propagate(right_syntax);

        // An X predicate merges the arms bitwise, so the result is always
        // four-state regardless of the arm types.
        let ty = if left.bad() || right.bad() {
            self.compilation.get_error_type()
        } else {
            self.binary_operator_result_type(left.ty(), right.ty(), true)
        };
        Expression::Ternary {
            ty,
            predicate: Box::new(predicate),
            left: Box::new(left),
            right: Box::new(right),
            span,
        }
    }

    fn bind_concatenation_expression(
        &self,
        operand_syntaxes: &[ExpressionSyntax],
        span: Span,
    ) -> Expression {
        let mut operands = Vec::with_capacity(operand_syntaxes.len());
        let mut total_width: u32 = 0;
        let mut four_state = false;
        let mut bad = false;
        for operand_syntax in operand_syntaxes {
            let operand = self.bind_and_propagate(operand_syntax);
            if operand.bad() || !operand.ty().is_integral() {
                bad = true;
            } else {
                total_width = total_width.saturating_add(operand.ty().width());
                four_state |= operand.ty().is_four_state();
            }
            operands.push(operand);
        }

        let ty = if bad {
            self.compilation.get_error_type()
        } else {
            self.compilation.get_type(total_width, false, four_state)
        };
        Expression::NaryConcat { ty, operands, span }
    }

    fn bind_replication_expression(
        &self,
        count_syntax: &ExpressionSyntax,
        concat_syntax: &ExpressionSyntax,
        span: Span,
    ) -> Expression {
        let count = self.bind_constant_expression(count_syntax);
        let concat = self.bind_and_propagate(concat_syntax);
        if count.bad() || concat.bad() {
            return self.bad_expr(None, span);
        }

        let Some(times) = constant_u64(&count) else {
            self.compilation
                .add_error(DiagCode::ExpressionNotConstant, count.span());
            return self.bad_expr(Some(count), span);
        };
        let width = u32::try_from(times)
            .ok()
            .and_then(|times| concat.ty().width().checked_mul(times));
        let Some(width) = width else {
            self.compilation
                .add_error(DiagCode::ExpressionNotConstant, count.span());
            return self.bad_expr(Some(count), span);
        };

        let ty = self
            .compilation
            .get_type(width, false, concat.ty().is_four_state());
        Expression::Replicate {
            ty,
            count: Box::new(count),
            concat: Box::new(concat),
            span,
        }
    }

    fn bind_select_expression(
        &self,
        value_syntax: &ExpressionSyntax,
        selector_syntax: &SelectorSyntax,
        span: Span,
    ) -> Expression {
        let value = self.bind_and_propagate(value_syntax);
        if value.bad() {
            return self.bad_expr(Some(value), span);
        }
        if !value.ty().is_integral() {
            self.compilation.add_error(
                DiagCode::BadUnaryExpression(value.ty().to_string().into()),
                span,
            );
            return self.bad_expr(Some(value), span);
        }

        // The declared direction of the first packed dimension decides which
        // bound is the most significant.
        let descending = value.ty().is_descending();
        let (selector, width) = match selector_syntax {
            SelectorSyntax::BitSelect { index } => {
                let index = self.bind_and_propagate(index);
                (
                    BoundSelector::BitSelect {
                        index: Box::new(index),
                    },
                    1,
                )
            }
            SelectorSyntax::SimpleRange { left, right } => {
                let left = self.bind_constant_expression(left);
                let right = self.bind_constant_expression(right);
                let (Some(msb), Some(lsb)) = (constant_i64(&left), constant_i64(&right)) else {
                    let at = if constant_i64(&left).is_none() {
                        left.span()
                    } else {
                        right.span()
                    };
                    self.compilation.add_error(DiagCode::ExpressionNotConstant, at);
                    return self.bad_expr(None, span);
                };
                let width = if descending { msb - lsb } else { lsb - msb } + 1;
                let Ok(width) = u32::try_from(width) else {
                    self.compilation.add_error(DiagCode::InvalidRangeSelect, span);
                    return self.bad_expr(None, span);
                };
                if width == 0 {
                    self.compilation.add_error(DiagCode::InvalidRangeSelect, span);
                    return self.bad_expr(None, span);
                }
                (
                    BoundSelector::SimpleRange {
                        left: Box::new(left),
                        right: Box::new(right),
                    },
                    width,
                )
            }
            SelectorSyntax::AscendingRange { base, width }
            | SelectorSyntax::DescendingRange { base, width } => {
                let ascending = matches!(selector_syntax, SelectorSyntax::AscendingRange { .. });
                let base = self.bind_and_propagate(base);
                let width_expr = self.bind_constant_expression(width);
                let Some(width) = constant_i64(&width_expr) else {
                    self.compilation
                        .add_error(DiagCode::ExpressionNotConstant, width_expr.span());
                    return self.bad_expr(None, span);
                };
                let width = match u32::try_from(width) {
                    Ok(width) if width > 0 => width,
                    _ => {
                        self.compilation.add_error(DiagCode::InvalidRangeSelect, span);
                        return self.bad_expr(None, span);
                    }
                };
                (
                    BoundSelector::IndexedRange {
                        ascending,
                        base: Box::new(base),
                        width: Box::new(width_expr),
                    },
                    width,
                )
            }
        };

        let ty = self.compilation.get_type(
            width,
            value.ty().is_signed(),
            value.ty().is_four_state(),
        );
        Expression::Select {
            ty,
            value: Box::new(value),
            selector,
            span,
        }
    }

    fn bind_subroutine_call(
        &self,
        target: &Identifier,
        argument_syntaxes: &[ExpressionSyntax],
        span: Span,
    ) -> Expression {
        let result = self.scope.lookup(&target.name, LookupHint::Callable);
        let Some(symbol) = result.found_symbol().cloned() else {
            self.compilation.add_error(
                DiagCode::UndeclaredIdentifier(target.name.clone()),
                target.span,
            );
            return self.bad_expr(None, span);
        };
        let SymbolKind::Subroutine {
            arguments: formals,
            return_type,
        } = &symbol.kind
        else {
            unreachable!("callable lookup returned a non-subroutine");
        };

        // TODO: under-supply needs default argument values before it can be
        // checked here.
        if formals.len() < argument_syntaxes.len() {
            self.compilation.add_error(
                DiagCode::TooManyArguments {
                    expected: formals.len(),
                    actual: argument_syntaxes.len(),
                },
                target.span,
            );
            return self.bad_expr(None, span);
        }

        let mut arguments = Vec::with_capacity(argument_syntaxes.len());
        for (actual, formal) in argument_syntaxes.iter().zip(formals) {
            let formal_ty = formal
                .value_type()
                .expect("formal arguments always carry a type");
            arguments.push(self.bind_assignment_like_context(actual, actual.span(), formal_ty));
        }

        let ty = Rc::clone(return_type);
        Expression::Call {
            ty,
            subroutine: Rc::clone(&symbol),
            arguments,
            span,
        }
    }

    // ========================================================================
    // Statements
    // ========================================================================

    /// Binds a single statement.
    #[must_use]
    pub fn bind_statement(&self, syntax: &StatementSyntax) -> Statement {
        match syntax {
            StatementSyntax::Return {
                value,
                keyword_span,
                span,
            } => self.bind_return_statement(value.as_deref(), *keyword_span, *span),
            StatementSyntax::Conditional {
                condition,
                if_true,
                if_false,
                span,
            } => self.bind_conditional_statement(condition, if_true, if_false.as_deref(), *span),
            // For-loop binding is reserved; initializer declarations need an
            // implicit block before this can land.
            StatementSyntax::ForLoop { span } => Statement::Invalid { span: *span },
            StatementSyntax::Expression { expr, span } => Statement::Expression {
                expr: self.bind_self_determined_expression(expr),
                span: *span,
            },
        }
    }

    /// Binds a statement list: a declaration statement for every variable
    /// member of the scope, then the statements in order.
    #[must_use]
    pub fn bind_statement_list(&self, items: &[StatementSyntax]) -> Statement {
        tracing::debug!(items = items.len(), "binding statement list");
        let mut statements = Vec::new();
        for member in self.scope.members() {
            if matches!(member.kind, SymbolKind::Variable { .. }) {
                statements.push(Statement::VariableDecl {
                    span: member.span,
                    symbol: member,
                });
            }
        }
        for item in items {
            statements.push(self.bind_statement(item));
        }
        Statement::List { statements }
    }

    fn bind_return_statement(
        &self,
        value: Option<&ExpressionSyntax>,
        keyword_span: Span,
        span: Span,
    ) -> Statement {
        let Some(subroutine) = self.scope.find_ancestor_subroutine() else {
            self.compilation
                .add_error(DiagCode::ReturnNotInSubroutine, keyword_span);
            return Statement::Invalid { span };
        };
        let SymbolKind::Subroutine { return_type, .. } = &subroutine.kind else {
            unreachable!("ancestor lookup returned a non-subroutine");
        };
        let value =
            value.map(|value| self.bind_assignment_like_context(value, keyword_span, return_type));
        Statement::Return { value, span }
    }

    fn bind_conditional_statement(
        &self,
        condition: &ExpressionSyntax,
        if_true: &StatementSyntax,
        if_false: Option<&StatementSyntax>,
        span: Span,
    ) -> Statement {
        let condition = self.bind_self_determined_expression(condition);
        let if_true = Box::new(self.bind_statement(if_true));
        let if_false = if_false.map(|stmt| Box::new(self.bind_statement(stmt)));
        Statement::Conditional {
            condition,
            if_true,
            if_false,
            span,
        }
    }

    // ========================================================================
    // Typing rules
    // ========================================================================

    /// The result type of a binary operator: the wider width, signed only if
    /// both sides are, four-state if either side is (or `force_four_state`).
    /// Real operands switch the result to real/shortreal by width.
    fn binary_operator_result_type(
        &self,
        left: &Rc<TypeSymbol>,
        right: &Rc<TypeSymbol>,
        force_four_state: bool,
    ) -> Rc<TypeSymbol> {
        let width = left.width().max(right.width());
        self.numeric_result_type(left, right, width, force_four_state)
    }

    /// The result type of shift and power operators: like
    /// [`Self::binary_operator_result_type`], but only the left operand's
    /// width participates.
    fn shift_or_power_result_type(
        &self,
        left: &Rc<TypeSymbol>,
        right: &Rc<TypeSymbol>,
        force_four_state: bool,
    ) -> Rc<TypeSymbol> {
        self.numeric_result_type(left, right, left.width(), force_four_state)
    }

    fn numeric_result_type(
        &self,
        left: &Rc<TypeSymbol>,
        right: &Rc<TypeSymbol>,
        width: u32,
        force_four_state: bool,
    ) -> Rc<TypeSymbol> {
        if left.is_real() || right.is_real() {
            if width >= 64 {
                self.compilation.get_real_type()
            } else {
                self.compilation.get_short_real_type()
            }
        } else {
            let signed = left.is_signed() && right.is_signed();
            let four_state = force_four_state || left.is_four_state() || right.is_four_state();
            self.compilation.get_type(width, signed, four_state)
        }
    }

    /// Widens `rhs` to `lhs_type` when the target is wider, then propagates
    /// the new type down. Returns whether anything changed.
    fn propagate_assignment_like(&self, rhs: &mut Expression, lhs_type: &Rc<TypeSymbol>) -> bool {
        if lhs_type.width() > rhs.ty().width() {
            rhs.propagate_type(lhs_type, self.types());
            true
        } else {
            false
        }
    }

    /// Checks that a unary operator applies to its operand's type. Emits the
    /// diagnostic and returns false otherwise; a bad operand fails silently
    /// (it was already diagnosed).
    fn check_unary_applicability(
        &self,
        op: UnaryOperator,
        location: Span,
        operand: &Expression,
    ) -> bool {
        if operand.bad() {
            return false;
        }
        let ty = operand.ty();
        let good = match op {
            UnaryOperator::Plus | UnaryOperator::Minus | UnaryOperator::LogicalNot => {
                ty.is_integral() || ty.is_real()
            }
            _ => ty.is_integral(),
        };
        if good {
            return true;
        }
        self.compilation.add_error(
            DiagCode::BadUnaryExpression(ty.to_string().into()),
            location,
        );
        false
    }

    /// Checks that a binary operator applies to its operands' types.
    fn check_binary_applicability(
        &self,
        op: BinaryOperator,
        location: Span,
        left: &Expression,
        right: &Expression,
    ) -> bool {
        if left.bad() || right.bad() {
            return false;
        }
        let (lt, rt) = (left.ty(), right.ty());
        let good = match op.class() {
            // Modulo stays integral-only even though it groups with the
            // arithmetic operators; shifts are integral-only while power
            // accepts reals.
            BinaryOperatorClass::Arithmetic => match op {
                BinaryOperator::Mod
                | BinaryOperator::BinaryAnd
                | BinaryOperator::BinaryOr
                | BinaryOperator::BinaryXor
                | BinaryOperator::BinaryXnor => lt.is_integral() && rt.is_integral(),
                _ => {
                    (lt.is_integral() || lt.is_real()) && (rt.is_integral() || rt.is_real())
                }
            },
            BinaryOperatorClass::Comparison | BinaryOperatorClass::Logical => {
                (lt.is_integral() || lt.is_real()) && (rt.is_integral() || rt.is_real())
            }
            BinaryOperatorClass::ShiftOrPower => match op {
                BinaryOperator::Power => {
                    (lt.is_integral() || lt.is_real()) && (rt.is_integral() || rt.is_real())
                }
                _ => lt.is_integral() && rt.is_integral(),
            },
        };
        if good {
            return true;
        }
        self.compilation.add_error(
            DiagCode::BadBinaryExpression(lt.to_string().into(), rt.to_string().into()),
            location,
        );
        false
    }

    /// An invalid expression carrying the error type.
    fn bad_expr(&self, inner: Option<Expression>, span: Span) -> Expression {
        Expression::Invalid {
            ty: self.compilation.get_error_type(),
            inner: inner.map(Box::new),
            span,
        }
    }
}

/// A constant, two-state, 64-bit-representable value, or `None`.
fn constant_u64(expr: &Expression) -> Option<u64> {
    expr.eval()
        .filter(|value| !value.has_unknown())
        .and_then(|value| value.as_u64())
}

/// A constant, two-state, `i64`-representable value, or `None`.
fn constant_i64(expr: &Expression) -> Option<i64> {
    expr.eval()
        .filter(|value| !value.has_unknown())
        .and_then(|value| value.as_i64())
}
