//! Tests against a real device. Each test is skipped when no adapter is
//! available on the machine running it.

use hetero_bench::prelude::*;

fn context() -> Option<GpuContext> {
    match GpuContext::new(&Config::default()) {
        Ok(ctx) => Some(ctx),
        Err(err) => {
            eprintln!("skipping GPU test: {}", err);
            None
        }
    }
}

fn ramp(len: usize, scale: i32) -> Vec<i32> {
    (0..len as i32).map(|i| i.wrapping_mul(scale)).collect()
}

#[test]
fn test_reference_scenario_on_device() {
    let Some(ctx) = context() else { return };
    let adder = GpuArraySum::new(&ctx, &KernelSource::sum_arrays()).unwrap();

    let a = [3, 3, 3, 3];
    let b = [5, 5, 5, 5];
    let c_par = adder.par_sum(&a, &b).unwrap();

    assert_eq!(c_par, vec![8, 8, 8, 8]);
    assert!(equal(&seq_sum(&a, &b), &c_par));
}

#[test]
fn test_empty_and_single_element() {
    let Some(ctx) = context() else { return };
    let adder = GpuArraySum::new(&ctx, &KernelSource::sum_arrays()).unwrap();

    assert!(adder.par_sum(&[], &[]).unwrap().is_empty());
    assert_eq!(adder.par_sum(&[41], &[1]).unwrap(), vec![42]);
}

#[test]
fn test_work_group_boundaries() {
    let Some(ctx) = context() else { return };
    let adder = GpuArraySum::new(&ctx, &KernelSource::sum_arrays()).unwrap();

    for len in [255, 256, 257, 511, 512, 513, 1000] {
        let a = ramp(len, 3);
        let b = ramp(len, -7);
        let c_par = adder.par_sum(&a, &b).unwrap();
        assert_eq!(c_par.len(), len);
        assert!(equal(&seq_sum(&a, &b), &c_par), "mismatch at len {}", len);
    }
}

#[test]
fn test_large_array_and_determinism() {
    let Some(ctx) = context() else { return };
    let adder = GpuArraySum::new(&ctx, &KernelSource::sum_arrays()).unwrap();

    let len = 1 << 20;
    let a = ramp(len, 1);
    let b = ramp(len, 2);
    let expected = seq_sum(&a, &b);

    let first = adder.par_sum(&a, &b).unwrap();
    assert_eq!(first.len(), len);
    assert!(equal(&expected, &first));

    for _ in 0..3 {
        assert_eq!(adder.par_sum(&a, &b).unwrap(), first);
    }
}

#[test]
fn test_dispatch_spills_into_second_grid_row() {
    let Some(ctx) = context() else { return };
    let adder = GpuArraySum::new(&ctx, &KernelSource::sum_arrays()).unwrap();

    let limits = ctx.limits();
    let per_dim = limits.max_compute_workgroups_per_dimension;
    let workgroup_size = KernelSource::sum_arrays().workgroup_size;
    let len = per_dim as usize * workgroup_size as usize + 777;
    let bytes = (len * std::mem::size_of::<i32>()) as u64;
    if bytes > limits.max_storage_buffer_binding_size as u64 {
        eprintln!("skipping: {} bytes exceed the storage binding limit", bytes);
        return;
    }

    let (_, rows) = hetero_bench::sum::dispatch_grid(len, workgroup_size, per_dim).unwrap();
    assert!(rows >= 2);

    let a = ramp(len, 5);
    let b = ramp(len, -3);
    let c_par = adder.par_sum(&a, &b).unwrap();

    assert_eq!(c_par.len(), len);
    assert!(equal(&seq_sum(&a, &b), &c_par));
}

#[test]
fn test_overflow_wraps_like_host() {
    let Some(ctx) = context() else { return };
    let adder = GpuArraySum::new(&ctx, &KernelSource::sum_arrays()).unwrap();

    let a = [i32::MAX, i32::MIN, -1];
    let b = [1, -1, 1];
    assert_eq!(adder.par_sum(&a, &b).unwrap(), seq_sum(&a, &b));
}

#[test]
fn test_benchmark_on_device() {
    let Some(ctx) = context() else { return };
    let adder = GpuArraySum::new(&ctx, &KernelSource::sum_arrays()).unwrap();

    let config = BenchConfig {
        array_len: 4096,
        repetitions: 2,
        ..BenchConfig::default()
    };
    let report = benchmark::run(&config, &adder).unwrap();

    assert!(report.passed);
    assert_eq!(report.device, ctx.info().name);
    assert_eq!(report.first, Some((3, 5, 8)));
}

#[test]
fn test_build_failure_reports_log() {
    let Some(ctx) = context() else { return };
    let broken = KernelSource::new(
        "broken",
        "@compute @workgroup_size(1) fn broken( { let x = ; }",
        "broken",
        1,
    );

    match broken.compile(&ctx) {
        Err(Error::Build { log }) => assert!(!log.trim().is_empty()),
        other => panic!("expected build error, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_missing_entry_point_is_build_error() {
    let Some(ctx) = context() else { return };
    let source = KernelSource::new("sum", KernelSource::sum_arrays().text, "no_such_entry", 256);

    assert!(matches!(source.compile(&ctx), Err(Error::Build { .. })));
}

#[test]
fn test_hello_kernel() {
    let Some(ctx) = context() else { return };
    let greeting = run_hello(&ctx, &KernelSource::hello()).unwrap();
    assert_eq!(greeting, "Hello, World!\n");
}

#[test]
fn test_context_reports_selected_device() {
    let Some(ctx) = context() else { return };
    let info = ctx.info();

    assert!(!info.name.is_empty() || !info.platform.is_empty());
    assert!(info.max_work_group_size > 0);
    assert!(ctx.limits().max_storage_buffer_binding_size > 0);
}
