// The concurrency gate inside and outside tokio runtimes.
//
// Output must not depend on whether the native calls ran inside
// `block_in_place`, inline on a current-thread runtime, or with no runtime.

use bzs::gate::Gate;
use bzs::{Compressor, CompressorOptions, Decompressor, DecompressorOptions};

fn data() -> Vec<u8> {
    (0..200_000u32).map(|i| (i % 251) as u8 ^ (i / 1000) as u8).collect()
}

fn gated_options() -> (CompressorOptions, DecompressorOptions) {
    let c = CompressorOptions::builder()
        .block_size(2)
        .concurrency_release(true)
        .build()
        .unwrap();
    let d = DecompressorOptions::builder().concurrency_release(true).build().unwrap();
    (c, d)
}

fn run_round_trip(input: &[u8], copts: CompressorOptions, dopts: DecompressorOptions) -> Vec<u8> {
    let mut c = Compressor::new(copts).unwrap();
    let mut packed = Vec::new();
    for piece in input.chunks(10_000) {
        packed.extend(c.write(piece).unwrap());
    }
    packed.extend(c.finish().unwrap());
    c.close().unwrap();

    let mut d = Decompressor::new(dopts).unwrap();
    let mut back = Vec::new();
    for piece in packed.chunks(3_000) {
        back.extend(d.read(piece).unwrap());
    }
    d.finish_input().unwrap();
    d.close().unwrap();
    assert_eq!(back, input);
    packed
}

#[test]
fn no_runtime_matches_ungated() {
    let input = data();
    let (c, d) = gated_options();
    let gated = run_round_trip(&input, c, d);
    let plain = run_round_trip(&input, CompressorOptions { concurrency_release: false, ..c }, d);
    assert_eq!(gated, plain);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn multi_thread_runtime_workers() {
    let input = data();
    let (c, d) = gated_options();
    let expected = run_round_trip(&input, CompressorOptions { concurrency_release: false, ..c }, d);

    let mut tasks = Vec::new();
    for _ in 0..4 {
        let input = input.clone();
        tasks.push(tokio::spawn(async move { run_round_trip(&input, c, d) }));
    }
    for task in tasks {
        assert_eq!(task.await.unwrap(), expected);
    }
}

#[tokio::test(flavor = "current_thread")]
async fn current_thread_runtime_runs_inline() {
    // block_in_place would panic here; the gate must not call it.
    let input = data();
    let (c, d) = gated_options();
    run_round_trip(&input, c, d);
    assert_eq!(Gate::new(true).run(|| 5), 5);
}

#[test]
fn gate_disabled_is_transparent() {
    let gate = Gate::new(false);
    assert!(!gate.is_enabled());
    assert_eq!(gate.run(|| "inline"), "inline");
}
