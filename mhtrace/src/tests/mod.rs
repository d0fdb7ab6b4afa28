use crate::erp::*;
use crate::tests::checks::*;
use crate::tests::models::*;
use crate::utils::render::*;
use crate::*;

use std::cell::Cell;
use std::rc::Rc;
use tracing::debug;
use tracing_test::traced_test;


#[test]
fn rejection_example() {
    for seed in 0..20 {
        let t = Trace::new(x_then_y(&UNIFORM, &[0.0, 1.0]), &Strategy::Rejection, &Options::seed(seed)).unwrap();
        assert!(t.conditions_satisfied());
        assert_eq!(t.value(":x:0"), Some(&Val::Bool(true)));
        assert_eq!(t.len(), 2);
        assert_eq!(
            t.addresses(),
            vec![Address::from(":x:0"), Address::from(":y:0")]
        );
        check_conservation("rejection_example", &t);
    }
}

#[test]
fn address_stability() {
    let mut t = Trace::unstarted(gaussians(3), &Options::seed(0));
    t.trace_update(false).unwrap();
    let first = t.addresses();
    assert_eq!(
        render_addresses(&first),
        "[:draw:0, :draw:1, :draw:2]".to_string()
    );
    t.trace_update(false).unwrap();
    assert_eq!(first, t.addresses());
    t.trace_update(true).unwrap();
    assert_eq!(first, t.addresses());
}

#[test]
fn nested_call_sites() {
    let mut t = Trace::unstarted(
        |ctx: &mut Ctx<'_>| -> Result<Val> {
            let a = ctx.call("outer", |ctx| {
                let x = flip(ctx, 0.5)?;
                let y = ctx.call("inner", |ctx| flip(ctx, 0.5))?;
                let z = flip(ctx, 0.5)?;
                Ok(x && y && z)
            })?;
            Ok(Val::Bool(a))
        },
        &Options::seed(0),
    );
    t.trace_update(false).unwrap();
    assert_eq!(
        t.addresses(),
        vec![
            Address::from(":outer:0"),
            Address::from(":outer:inner:0"),
            Address::from(":outer:1"),
        ]
    );
}

#[test]
fn idempotent_fixed_structure() {
    let mut t = Trace::new(gaussians(4), &Strategy::Rejection, &Options::seed(7)).unwrap();
    let (vals, lp) = (values(&t), t.joint_log_probability());
    for _ in 0..2 {
        t.trace_update(true).unwrap();
        assert_eq!(vals, values(&t));
        assert_eq!(lp, t.joint_log_probability());
        assert_eq!(t.new_log_probability(), 0.0);
        assert_eq!(t.removed_log_probability(), 0.0);
    }
    check_conservation("idempotent", &t);
}

#[test]
fn structural_pruning() {
    let mut t = Trace::new(
        x_then_y(&GAUSSIAN, &[0.0, 1.0]),
        &Strategy::Rejection,
        &Options::seed(1),
    )
    .unwrap();
    let y_lp = t.record(":y:0").unwrap().log_density;
    t.set_value(":x:0", Val::Bool(false)).unwrap();
    t.trace_update(false).unwrap();

    assert!(t.record(":y:0").is_none());
    assert_eq!(t.len(), 1);
    assert_eq!(t.removed_log_probability(), y_lp);
    check_close("pruned joint", 0.3_f64.ln(), t.joint_log_probability(), 1e-12);
    assert_eq!(t.removed_records().len(), 1);
    assert_eq!(t.removed_records()[0].address, Address::from(":y:0"));
    assert!(!t.conditions_satisfied());
    check_conservation("pruning", &t);
}

#[test]
fn deep_copy_isolation() {
    let t = Trace::new(gaussians(2), &Strategy::Rejection, &Options::seed(2)).unwrap();
    let before = values(&t);
    let mut c = t.deep_copy();
    assert_ne!(c.id(), t.id());
    c.set_value(":draw:0", Val::Float(42.0)).unwrap();
    c.trace_update(true).unwrap();
    assert_eq!(c.value(":draw:0"), Some(&Val::Float(42.0)));
    assert_eq!(before, values(&t));
    check_conservation("source", &t);
    check_conservation("copy", &c);
}

#[test]
fn stale_positional_record_is_replaced() {
    let discrete = Rc::new(Cell::new(true));
    let d = discrete.clone();
    let mut t = Trace::unstarted(
        move |ctx: &mut Ctx<'_>| -> Result<Val> {
            if d.get() {
                ctx.sample(&FLIP, &[0.5])
            } else {
                ctx.sample(&GAUSSIAN, &[0.0, 1.0])
            }
        },
        &Options::seed(3),
    );
    t.trace_update(false).unwrap();
    let flip_lp = t.joint_log_probability();
    check_close("flip", 0.5_f64.ln(), flip_lp, 1e-12);

    // the caller claims the structure is fixed, but the ERP at position 0 changed
    discrete.set(false);
    t.trace_update(true).unwrap();
    assert_eq!(t.len(), 1);
    let r = t.record(":0").unwrap();
    assert_eq!(r.erp.name(), "gaussian");
    assert_eq!(t.removed_log_probability(), flip_lp);
    assert_eq!(t.new_log_probability(), r.log_density);
    assert_eq!(t.joint_log_probability(), r.log_density);
    check_conservation("stale", &t);
}

#[test]
fn structural_flag_mismatch_is_replaced() {
    let structural = Rc::new(Cell::new(false));
    let s = structural.clone();
    let mut t = Trace::unstarted(
        move |ctx: &mut Ctx<'_>| -> Result<Val> {
            ctx.observe_choice(&FLIP, &[0.5], s.get(), None)
        },
        &Options::seed(3),
    );
    t.trace_update(false).unwrap();
    assert!(!t.record(":0").unwrap().structural);
    structural.set(true);
    t.trace_update(false).unwrap();
    assert!(t.record(":0").unwrap().structural);
    assert_eq!(t.removed_records().len(), 1);
    assert_eq!(t.len(), 1);
}

#[test]
fn changed_params_rescore() {
    let p = Rc::new(Cell::new(0.25));
    let q = p.clone();
    let mut t = Trace::unstarted(
        move |ctx: &mut Ctx<'_>| -> Result<Val> { ctx.sample(&FLIP, &[q.get()]) },
        &Options::seed(4),
    );
    t.trace_update(false).unwrap();
    let v = t.value(":0").cloned().unwrap();
    p.set(0.75);
    t.trace_update(true).unwrap();
    assert_eq!(t.value(":0"), Some(&v));
    let expected = if v == Val::Bool(true) { 0.75_f64.ln() } else { 0.25_f64.ln() };
    check_close("rescored", expected, t.joint_log_probability(), 1e-12);
    assert_eq!(t.record(":0").unwrap().params, vec![0.75]);
    assert_eq!(t.new_log_probability(), 0.0);
}

#[test]
fn falsy_observations_are_kept() {
    let observed = Rc::new(Cell::new(false));
    let o = observed.clone();
    let mut t = Trace::unstarted(
        move |ctx: &mut Ctx<'_>| -> Result<Val> {
            let free = flip(ctx, 0.5)?;
            let obs = ctx.observe(&FLIP, &[0.3], Val::Bool(o.get()))?;
            let zero = ctx.observe(&POISSON, &[2.0], Val::Int(0))?;
            Ok(Val::Vec(vec![Val::Bool(free), obs, zero]))
        },
        &Options::seed(5),
    );
    t.trace_update(false).unwrap();
    assert_eq!(t.value(":1"), Some(&Val::Bool(false)));
    assert_eq!(t.value(":2"), Some(&Val::Int(0)));
    assert!(t.record(":1").unwrap().conditioned);
    check_close("obs", 0.7_f64.ln(), t.record(":1").unwrap().log_density, 1e-12);
    check_close("zero", -2.0, t.record(":2").unwrap().log_density, 1e-12);
    assert_eq!(t.free_addresses(true, true), vec![Address::from(":0")]);

    observed.set(true);
    t.trace_update(true).unwrap();
    assert_eq!(t.value(":1"), Some(&Val::Bool(true)));
    check_close("reobs", 0.3_f64.ln(), t.record(":1").unwrap().log_density, 1e-12);
    check_conservation("observations", &t);
}

#[test]
fn free_addresses_by_class() {
    let t = Trace::new(x_then_y(&UNIFORM, &[0.0, 1.0]), &Strategy::Rejection, &Options::seed(6)).unwrap();
    assert_eq!(t.free_addresses(true, false), vec![Address::from(":x:0")]);
    assert_eq!(t.free_addresses(false, true), vec![Address::from(":y:0")]);
    assert_eq!(t.free_addresses(true, true).len(), 2);
    assert!(t.free_addresses(false, false).is_empty());
}

#[test]
fn factors_add_to_joint() {
    let mut t = Trace::unstarted(
        |ctx: &mut Ctx<'_>| -> Result<Val> {
            let x = flip(ctx, 0.5)?;
            ctx.factor(-1.5);
            ctx.factor(0.25);
            Ok(Val::Bool(x))
        },
        &Options::seed(0),
    );
    t.trace_update(false).unwrap();
    check_close("factor", 0.5_f64.ln() - 1.25, t.joint_log_probability(), 1e-12);
}

#[test]
fn conditions_conjoin_over_the_pass() {
    let mut t = Trace::unstarted(
        |ctx: &mut Ctx<'_>| -> Result<Val> {
            ctx.condition(true);
            ctx.condition(false);
            ctx.condition(true);
            Ok(Val::Bool(true))
        },
        &Options::seed(0),
    );
    t.trace_update(false).unwrap();
    assert!(!t.conditions_satisfied());
    assert!(t.is_empty());
    assert_eq!(t.return_value(), Some(&Val::Bool(true)));
}

#[test]
fn detached_context_just_samples() {
    let mut rng = Options::seed(9).rng();
    let mut ctx = Ctx::detached(&mut rng);
    assert!(!ctx.is_active());
    let x = uniform(&mut ctx, 2.0, 3.0).unwrap();
    assert!((2.0..3.0).contains(&x));
    assert_eq!(
        ctx.observe(&FLIP, &[0.5], Val::Bool(false)).unwrap(),
        Val::Bool(false)
    );
    ctx.factor(-100.0);
    ctx.condition(false);
    let r = x_then_y(&UNIFORM, &[0.0, 1.0])(&mut ctx).unwrap();
    assert!(matches!(r, Val::Bool(_)));
    assert_eq!(registry::active(), None);
}

#[test]
fn nested_passes_are_rejected() {
    let mut t = Trace::unstarted(
        |_ctx: &mut Ctx<'_>| -> Result<Val> {
            let mut inner = Trace::unstarted(
                |ctx: &mut Ctx<'_>| -> Result<Val> { ctx.sample(&FLIP, &[0.5]) },
                &Options::seed(1),
            );
            inner.trace_update(false)?;
            Ok(Val::Bool(true))
        },
        &Options::seed(0),
    );
    assert_eq!(t.trace_update(false), Err(TraceError::Reentrant()));
    assert_eq!(registry::active(), None);
}

#[test]
fn computation_errors_propagate() {
    let mut t = Trace::unstarted(
        |ctx: &mut Ctx<'_>| -> Result<Val> {
            flip(ctx, 0.5)?;
            ctx.sample(&GAUSSIAN, &[0.0])
        },
        &Options::seed(0),
    );
    let err = t.trace_update(false).unwrap_err();
    assert!(matches!(err, TraceError::InvalidParams { .. }), "{}", err);
    assert_eq!(registry::active(), None);
    // the trace stays usable
    let err = t.trace_update(true).unwrap_err();
    assert!(matches!(err, TraceError::InvalidParams { .. }));
}

#[test]
fn aborted_pass_leaves_an_unsatisfied_consistent_trace() {
    let mut t = Trace::unstarted(
        |ctx: &mut Ctx<'_>| -> Result<Val> {
            ctx.condition(true);
            gaussian(ctx, 0.0, 1.0)?;
            ctx.sample(&GAUSSIAN, &[0.0])
        },
        &Options::seed(0),
    );
    assert!(t.trace_update(false).is_err());
    assert!(!t.conditions_satisfied());
    assert_eq!(t.len(), 1);
    assert_eq!(t.records().count(), 1);
    assert_eq!(t.addresses(), vec![Address::from(":0")]);
    check_conservation("aborted", &t);
}

#[test]
fn aborted_pass_drops_shadowed_records() {
    let failing = Rc::new(Cell::new(false));
    let f = failing.clone();
    let mut t = Trace::unstarted(
        move |ctx: &mut Ctx<'_>| -> Result<Val> {
            if f.get() {
                ctx.sample(&GAUSSIAN, &[0.0, 1.0])?;
                ctx.sample(&GAUSSIAN, &[0.0])
            } else {
                let x = flip(ctx, 0.5)?;
                flip(ctx, 0.5)?;
                Ok(Val::Bool(x))
            }
        },
        &Options::seed(1),
    );
    t.trace_update(false).unwrap();
    assert!(t.conditions_satisfied());
    assert_eq!(t.len(), 2);

    failing.set(true);
    assert!(t.trace_update(false).is_err());
    assert!(!t.conditions_satisfied());
    assert_eq!(t.len(), t.records().count());
    assert_eq!(t.record(":0").unwrap().erp.name(), "gaussian");
    assert_eq!(t.record(":1").unwrap().erp.name(), "flip");
    assert_eq!(t.removed_records().len(), 1);
    assert_eq!(t.removed_records()[0].erp.name(), "flip");
    check_conservation("shadowed", &t);

    failing.set(false);
    t.trace_update(true).unwrap();
    assert!(t.conditions_satisfied());
    assert_eq!(t.len(), 2);
    assert_eq!(t.records().count(), 2);
    check_conservation("recovered", &t);
}

#[test]
fn structural_diff() {
    let t = Trace::new(
        x_then_y(&GAUSSIAN, &[0.0, 1.0]),
        &Strategy::Rejection,
        &Options::seed(8),
    )
    .unwrap();
    let mut u = t.deep_copy();
    u.set_value(":x:0", Val::Bool(false)).unwrap();
    u.trace_update(false).unwrap();

    assert_eq!(t.variables_only_in(&u), vec![Address::from(":y:0")]);
    assert!(u.variables_only_in(&t).is_empty());
    assert_eq!(
        t.log_probability_only_in(&u),
        t.record(":y:0").unwrap().log_density
    );
    assert_eq!(u.log_probability_only_in(&t), 0.0);
}

#[test]
#[traced_test]
fn display_lists_records() {
    let t = Trace::new(x_then_y(&UNIFORM, &[0.0, 1.0]), &Strategy::Rejection, &Options::seed(0)).unwrap();
    let s = t.to_string();
    debug!("{}", s);
    assert!(s.contains(":x:0 ~ flip[0.7] [structural] = true"));
    assert!(s.contains(":y:0 ~ uniform[0, 1]"));
    assert!(s.lines().count() == 3);
    assert!(logs_contain("pass complete"));
}

#[test]
fn addresser_counts_per_path() {
    let mut a = addressing::Addresser::new();
    assert_eq!(a.current_address().address(), Address::from(":0"));
    a.enter("f");
    assert_eq!(a.depth(), 1);
    assert_eq!(a.current_address().address(), Address::from(":f:0"));
    assert_eq!(a.current_address().address(), Address::from(":f:1"));
    a.leave("f");
    assert_eq!(a.current_address().address(), Address::from(":1"));
    a.enter("f");
    let site = a.current_address();
    assert_eq!((site.path, site.count), (":f", 2));
    assert_eq!(site.address(), Address::from(":f:2"));
    a.reset();
    assert_eq!(a.depth(), 0);
    assert_eq!(a.current_address().address(), Address::from(":0"));
    assert!(Address::from(":f:2").is_at(":f", 2));
    assert!(!Address::from(":f:2").is_at(":f", 1));
}
