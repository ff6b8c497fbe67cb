use mica_compiler::{compile_to_ir, compile_to_tac, Opcode};

fn tac_lines(source: &str) -> Vec<String> {
    compile_to_ir(source)
        .unwrap_or_else(|e| panic!("compilation failed for {source:?}: {e}"))
        .to_lines()
}

// ── Straight-line lowering ───────────────────────────────────────────────

#[test]
fn simple_function_body() {
    let lines = tac_lines("fn int f(int x){ return x + 1; }");
    assert_eq!(
        lines,
        vec![
            "",
            "FUNCTION f:",
            "  t0 = x ADD 1",
            "  RETURN t0",
            "END_FUNCTION f",
        ]
    );
}

#[test]
fn top_level_declaration_before_function() {
    let lines = tac_lines("int g = 3; fn int main(){ return g; }");
    assert_eq!(
        lines,
        vec![
            "  g = 3",
            "",
            "FUNCTION main:",
            "  RETURN g",
            "END_FUNCTION main",
        ]
    );
}

#[test]
fn declaration_without_initializer_emits_nothing() {
    let lines = tac_lines("fn int f(){ int x; return 0; }");
    assert_eq!(lines, vec!["", "FUNCTION f:", "  RETURN 0", "END_FUNCTION f"]);
}

#[test]
fn unary_minus_lowers_to_neg() {
    let lines = tac_lines("fn int f(int x){ int y = -x; return y; }");
    assert_eq!(
        lines,
        vec![
            "",
            "FUNCTION f:",
            "  t0 = NEG x",
            "  y = t0",
            "  RETURN y",
            "END_FUNCTION f",
        ]
    );
}

#[test]
fn unary_plus_is_a_passthrough() {
    let lines = tac_lines("fn int f(int x){ return +x; }");
    assert_eq!(lines, vec!["", "FUNCTION f:", "  RETURN x", "END_FUNCTION f"]);
}

#[test]
fn parentheses_change_evaluation_order() {
    let lines = tac_lines("fn int f(){ return (1 + 2) * 3; }");
    assert_eq!(
        lines,
        vec![
            "",
            "FUNCTION f:",
            "  t0 = 1 ADD 2",
            "  t1 = t0 MUL 3",
            "  RETURN t1",
            "END_FUNCTION f",
        ]
    );
}

// ── Control flow ─────────────────────────────────────────────────────────

#[test]
fn if_else_shape() {
    let lines = tac_lines("fn int f(){ if(true){ return 1; } else { return 2; } }");
    assert_eq!(
        lines,
        vec![
            "",
            "FUNCTION f:",
            "  IF_FALSE true GOTO L0",
            "  RETURN 1",
            "  GOTO L1",
            "L0:",
            "  RETURN 2",
            "L1:",
            "END_FUNCTION f",
        ]
    );
}

#[test]
fn if_without_else_uses_a_single_label() {
    let lines = tac_lines("fn int f(int x){ if(x > 0){ x = 1; } return x; }");
    assert_eq!(
        lines,
        vec![
            "",
            "FUNCTION f:",
            "  t0 = x GT 0",
            "  IF_FALSE t0 GOTO L0",
            "  x = 1",
            "L0:",
            "  RETURN x",
            "END_FUNCTION f",
        ]
    );
}

#[test]
fn while_loop_shape() {
    let lines =
        tac_lines("fn int f(int n){ int s = 0; while(n > 0){ s += n; n -= 1; } return s; }");
    assert_eq!(
        lines,
        vec![
            "",
            "FUNCTION f:",
            "  s = 0",
            "L0:",
            "  t0 = n GT 0",
            "  IF_FALSE t0 GOTO L1",
            "  t1 = s ADD n",
            "  s = t1",
            "  t2 = n SUB 1",
            "  n = t2",
            "  GOTO L0",
            "L1:",
            "  RETURN s",
            "END_FUNCTION f",
        ]
    );
}

// ── Calls ────────────────────────────────────────────────────────────────

#[test]
fn call_lowering() {
    let lines = tac_lines(
        "fn int add(int a, int b){ return a + b; } fn int main(){ return add(1, 2 + 3); }",
    );
    assert_eq!(
        lines,
        vec![
            "",
            "FUNCTION add:",
            "  t0 = a ADD b",
            "  RETURN t0",
            "END_FUNCTION add",
            "",
            "FUNCTION main:",
            "  t1 = 2 ADD 3",
            "  PARAM 1",
            "  PARAM t1",
            "  t2 = CALL add, 2",
            "  RETURN t2",
            "END_FUNCTION main",
        ]
    );
}

#[test]
fn param_runs_are_contiguous_for_nested_calls() {
    let source = "fn int g(int x){ return x; } \
                  fn int f(int a, int b){ return a; } \
                  fn int main(){ return f(g(1), 2); }";
    let lines = tac_lines(source);
    assert_eq!(
        lines,
        vec![
            "",
            "FUNCTION g:",
            "  RETURN x",
            "END_FUNCTION g",
            "",
            "FUNCTION f:",
            "  RETURN a",
            "END_FUNCTION f",
            "",
            "FUNCTION main:",
            "  PARAM 1",
            "  t0 = CALL g, 1",
            "  PARAM t0",
            "  PARAM 2",
            "  t1 = CALL f, 2",
            "  RETURN t1",
            "END_FUNCTION main",
        ]
    );
}

#[test]
fn call_as_statement_still_captures_a_result() {
    let lines = tac_lines("fn int f(){ return 0; } fn int main(){ f(); return 0; }");
    assert!(lines.contains(&"  t0 = CALL f, 0".to_string()));
}

// ── Increment and compound assignment ────────────────────────────────────

#[test]
fn postfix_and_prefix_increment_lowering() {
    let lines = tac_lines("fn int f(int x){ int y = x++; int z = ++x; return y + z; }");
    assert_eq!(
        lines,
        vec![
            "",
            "FUNCTION f:",
            "  t0 = x",
            "  t1 = x ADD 1",
            "  x = t1",
            "  y = t0",
            "  t2 = x ADD 1",
            "  x = t2",
            "  z = t2",
            "  t3 = y ADD z",
            "  RETURN t3",
            "END_FUNCTION f",
        ]
    );
}

#[test]
fn compound_assignment_lowers_through_a_temp() {
    let lines = tac_lines("fn int f(int x){ x *= 4; return x; }");
    assert_eq!(
        lines,
        vec![
            "",
            "FUNCTION f:",
            "  t0 = x MUL 4",
            "  x = t0",
            "  RETURN x",
            "END_FUNCTION f",
        ]
    );
}

#[test]
fn chained_assignment_copies_right_to_left() {
    let lines = tac_lines("fn int f(){ int a = 0; int b = 0; a = b = 7; return a; }");
    assert_eq!(
        lines,
        vec![
            "",
            "FUNCTION f:",
            "  a = 0",
            "  b = 0",
            "  b = 7",
            "  a = b",
            "  RETURN a",
            "END_FUNCTION f",
        ]
    );
}

// ── Properties ───────────────────────────────────────────────────────────

#[test]
fn generation_is_deterministic() {
    let source = "fn int fib(int n){ if(n < 2){ return n; } \
                  return fib(n - 1) + fib(n - 2); } \
                  fn int main(){ return fib(10); }";
    let first = compile_to_tac(source).unwrap();
    let second = compile_to_tac(source).unwrap();
    assert_eq!(first, second);
    // Counters restart per run.
    assert!(first.contains("t0"));
    assert!(first.contains("L0:"));
}

#[test]
fn every_jump_target_is_defined_exactly_once() {
    let source = "fn int f(int n){ \
                      int s = 0; \
                      while(n > 0){ \
                          if(n > 5){ s += n; } else { s -= n; } \
                          n -= 1; \
                      } \
                      if(s < 0){ s = 0; } \
                      return s; \
                  }";
    let ir = compile_to_ir(source).unwrap();
    let mut labels = Vec::new();
    let mut targets = Vec::new();
    for instr in &ir.instrs {
        match instr.op {
            Opcode::Label => labels.push(instr.result.clone()),
            Opcode::Goto | Opcode::IfFalse | Opcode::IfTrue => targets.push(instr.result.clone()),
            _ => {}
        }
    }
    let mut deduped = labels.clone();
    deduped.sort();
    deduped.dedup();
    assert_eq!(deduped.len(), labels.len(), "duplicate label definitions");
    for target in &targets {
        assert_eq!(
            labels.iter().filter(|l| *l == target).count(),
            1,
            "target {target} not defined exactly once"
        );
    }
}

#[test]
fn tac_rendering_matches_the_instruction_list() {
    let source = "fn int f(){ return 0; }";
    let ir = compile_to_ir(source).unwrap();
    let joined = compile_to_tac(source).unwrap();
    assert_eq!(ir.to_lines().join("\n"), joined);
    assert_eq!(ir.to_string(), format!("{joined}\n"));
}
