//! End-to-end tests: plan → dumps → header on disk → parsed back.

mod common;

use common::{FLOAT_BLOCKS, float_block, hlo_text, module_block, write_dumps};
use conv_fixtures::capture::{capture_case, case_seed};
use conv_fixtures::generate::{GenerateOptions, generate_header};
use conv_fixtures::schema::{SweepPlan, parse_plan_str};
use conv_fixtures::sweep::enumerate_combinations;

fn sweep_plan() -> SweepPlan {
    parse_plan_str(
        r"
input_shapes: [[1, 4, 4, 1], [1, 5, 6, 2]]
kernel_shapes: [[2, 2, 1, 1], [2, 2, 2, 3]]
strides: [[1, 1], [2, 1]]
paddings:
  - same
  - explicit: [[0, 0], [1, 0], [0, 1], [0, 0]]
dilations: [[1, 1]]
",
    )
    .unwrap()
}

/// Channel-consistent subset of `sweep_plan`: each input with its kernel.
fn consistent_plans() -> Vec<SweepPlan> {
    let base = sweep_plan();
    vec![
        SweepPlan {
            input_shapes: vec![base.input_shapes[0].clone()],
            kernel_shapes: vec![base.kernel_shapes[0].clone()],
            ..base.clone()
        },
        SweepPlan {
            input_shapes: vec![base.input_shapes[1].clone()],
            kernel_shapes: vec![base.kernel_shapes[1].clone()],
            ..base
        },
    ]
}

fn run(plan: &SweepPlan, root: &std::path::Path, seed: Option<u64>) -> String {
    let count = plan.combination_count();
    let options = GenerateOptions {
        dump_dir: write_dumps(root, count),
        output: root.join("plaidml_conv_test_io.h"),
        seed,
        cleanup: true,
    };
    let result = generate_header(plan, &options).unwrap();
    assert_eq!(result.combinations, count);
    std::fs::read_to_string(result.path).unwrap()
}

#[test]
fn every_block_has_one_entry_per_combination_in_order() {
    for plan in consistent_plans() {
        let dir = tempfile::tempdir().unwrap();
        let header = run(&plan, dir.path(), Some(9));
        let combos: Vec<_> = enumerate_combinations(&plan).collect();
        assert_eq!(combos.len(), 4);

        let blocks: Vec<_> = FLOAT_BLOCKS.iter().map(|b| float_block(&header, b)).collect();
        let modules = module_block(&header);
        assert_eq!(modules.len(), combos.len());
        for block in &blocks {
            assert_eq!(block.len(), combos.len());
        }

        for (i, c) in combos.iter().enumerate() {
            let shapes = c.shapes().unwrap();
            let sizes = [&shapes.input, &shapes.kernel1, &shapes.kernel2, &shapes.output]
                .map(|s| s.iter().product::<usize>());
            for (block, size) in blocks.iter().zip(sizes) {
                assert_eq!(block[i].len(), size, "combination {i}");
            }
            assert_eq!(modules[i], hlo_text(i));
        }
    }
}

#[test]
fn header_values_match_recomputed_cases() {
    let plan = &consistent_plans()[1];
    let dir = tempfile::tempdir().unwrap();
    let header = run(plan, dir.path(), Some(2024));
    let blocks: Vec<_> = FLOAT_BLOCKS.iter().map(|b| float_block(&header, b)).collect();

    for c in enumerate_combinations(plan) {
        let case = capture_case(&c, case_seed(2024, c.index), String::new()).unwrap();
        let arrays = [&case.input, &case.kernel1, &case.kernel2, &case.output];
        for (block, array) in blocks.iter().zip(arrays) {
            let expected: Vec<f32> = array.iter().copied().collect();
            assert_eq!(block[c.index], expected, "combination {}", c.index);
        }
    }
}

#[test]
fn unseeded_runs_share_structure_not_values() {
    let plan = &consistent_plans()[0];
    let a = tempfile::tempdir().unwrap();
    let b = tempfile::tempdir().unwrap();
    let ha = run(plan, a.path(), None);
    let hb = run(plan, b.path(), None);

    for name in FLOAT_BLOCKS {
        let ba = float_block(&ha, name);
        let bb = float_block(&hb, name);
        assert_eq!(ba.len(), bb.len());
        for (x, y) in ba.iter().zip(&bb) {
            assert_eq!(x.len(), y.len());
        }
    }
    assert_ne!(float_block(&ha, "conv_is"), float_block(&hb, "conv_is"));
}

#[test]
fn kernel2_swaps_last_two_axes_of_kernel1() {
    let plan = &consistent_plans()[1];
    for c in enumerate_combinations(plan) {
        let k1 = &c.kernel_shape;
        let k2 = c.kernel2_shape();
        assert_eq!(k2, vec![k1[0], k1[1], k1[3], k1[2]]);
    }
}

#[test]
fn documented_shape_propagation() {
    let plan = parse_plan_str(
        r"
input_shapes: [[1, 4, 4, 1]]
kernel_shapes: [[2, 2, 1, 1]]
paddings:
  - explicit: [[0, 0], [0, 0], [0, 0], [0, 0]]
",
    )
    .unwrap();
    let c = enumerate_combinations(&plan).next().unwrap();
    let shapes = c.shapes().unwrap();
    assert_eq!(shapes.hidden, vec![1, 3, 3, 1]);
    assert_eq!(shapes.output, vec![1, 2, 2, 1]);

    let widened = conv_fixtures::kernels::conv2d::conv2d_output_shape(
        &shapes.hidden,
        &[1, 1, 1, 2],
        &c.params(),
    )
    .unwrap();
    assert_eq!(widened, [1, 3, 3, 2]);
}

#[test]
fn builtin_plan_is_ready_to_generate() {
    let plan = SweepPlan::builtin();
    let c = enumerate_combinations(&plan).next().unwrap();
    let shapes = c.shapes().unwrap();
    assert_eq!(shapes.output, vec![1, 220, 220, 3]);
}
