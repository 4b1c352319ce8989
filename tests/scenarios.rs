use pull_signals::{input, read, read2, read3, Computed, ReactiveError};
use std::cell::Cell;
use std::rc::Rc;

#[test]
fn basic_multiply() {
    let a = input(1);
    let d = a.read(|x| Computed::value(x * 2));

    assert_eq!(d.get().unwrap(), 2);
    a.set(4).unwrap();
    assert_eq!(d.get().unwrap(), 8);
    a.set(6).unwrap();
    assert_eq!(d.get().unwrap(), 12);
}

#[test]
fn lazy_and_cached_counter() {
    let count = Rc::new(Cell::new(0));
    let count_clone = count.clone();
    let a = input(1);
    let c = a.read(move |x| {
        count_clone.set(count_clone.get() + 1);
        Computed::value(x)
    });

    assert_eq!(count.get(), 0);

    assert_eq!(c.get().unwrap(), 1);
    assert_eq!(count.get(), 1);

    assert_eq!(c.get().unwrap(), 1);
    assert_eq!(count.get(), 1);
}

#[test]
fn parity_short_circuit() {
    let x = input(0);
    let parity_count = Rc::new(Cell::new(0));
    let parity_count_clone = parity_count.clone();
    let parity = x.read(move |n| {
        parity_count_clone.set(parity_count_clone.get() + 1);
        Computed::value(n % 2 == 0)
    });

    let label_count = Rc::new(Cell::new(0));
    let label_count_clone = label_count.clone();
    let label = parity.read(move |p| {
        label_count_clone.set(label_count_clone.get() + 1);
        Computed::value(if p { "even" } else { "odd" })
    });

    assert_eq!(label.get().unwrap(), "even");
    assert_eq!(label_count.get(), 1);

    x.set(2).unwrap();
    assert_eq!(label.get().unwrap(), "even");
    assert_eq!(label_count.get(), 1, "parity unchanged, label must not recompute");

    x.set(1).unwrap();
    assert_eq!(label.get().unwrap(), "odd");
    assert_eq!(label_count.get(), 2);
}

#[test]
fn conditional_branch_detachment() {
    let x = input("x".to_string());
    let y = input("y".to_string());
    let b = input(true);

    let x_branch = x.clone();
    let y_branch = y.clone();
    let z = b.read(move |bv| {
        if bv {
            Computed::signal(x_branch.read(|v| Computed::value(v)))
        } else {
            Computed::signal(y_branch.read(|v| Computed::value(v)))
        }
    });

    assert_eq!(z.get().unwrap(), "x");

    y.set("y2".to_string()).unwrap();
    assert_eq!(z.get().unwrap(), "x", "writes to the untaken branch must not affect z");

    x.set("x2".to_string()).unwrap();
    assert_eq!(z.get().unwrap(), "x2");

    b.set(false).unwrap();
    assert_eq!(z.get().unwrap(), "y2");

    x.set("x3".to_string()).unwrap();
    assert_eq!(z.get().unwrap(), "y2", "x is now detached");
}

#[test]
fn multi_source() {
    let a = input(1);
    let b = input(2);
    let c = read2(&a, &b, |av, bv| Computed::value(av + bv));

    assert_eq!(c.get().unwrap(), 3);
    a.set(5).unwrap();
    assert_eq!(c.get().unwrap(), 7);
    b.set(10).unwrap();
    assert_eq!(c.get().unwrap(), 15);
}

#[test]
fn derivation_returning_a_signal() {
    let a = input(1);
    let b = input(2);
    let c = input(false);
    let res = read3(&a, &b, &c, |av, bv, cv| {
        if cv {
            Computed::value(av)
        } else {
            Computed::value(bv)
        }
    });

    assert_eq!(res.get().unwrap(), 2);
    c.set(true).unwrap();
    assert_eq!(res.get().unwrap(), 1);
}

#[test]
fn non_reactive_read_rejection() {
    let a = input(1);
    let a_clone = a.clone();
    let d = a.read(move |_| Computed::value(a_clone.get().unwrap_or(0) * 2));

    assert_eq!(d.get(), Err(ReactiveError::NonReactiveAccess));
}

#[test]
fn multi_form_recomputes_more_often_than_nested_single_reads() {
    // §4.4: the n-ary form is observably equivalent in output to nested
    // single-source reads, but differs in recomputation frequency, because
    // the nested form constructs a fresh inner signal on every outer
    // recomputation while the n-ary form does not.
    let a = input(1);
    let b = input(10);

    let joint_runs = Rc::new(Cell::new(0));
    let joint_runs_clone = joint_runs.clone();
    let joint = read2(&a, &b, move |av, bv| {
        joint_runs_clone.set(joint_runs_clone.get() + 1);
        Computed::value(av + bv)
    });

    assert_eq!(joint.get().unwrap(), 11);
    a.set(2).unwrap();
    assert_eq!(joint.get().unwrap(), 12);
    assert_eq!(joint_runs.get(), 2);

    let inner_runs = Rc::new(Cell::new(0));
    let inner_runs_clone = inner_runs.clone();
    let b_for_closure = b.clone();
    let nested = a.read(move |av| {
        let inner_runs_clone = inner_runs_clone.clone();
        Computed::signal(b_for_closure.read(move |bv| {
            inner_runs_clone.set(inner_runs_clone.get() + 1);
            Computed::value(av + bv)
        }))
    });

    assert_eq!(nested.get().unwrap(), 12);
    assert_eq!(inner_runs.get(), 1);
}
