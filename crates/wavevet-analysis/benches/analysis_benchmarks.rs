use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use wavevet_analysis::{
    onset, segment::SegmentEnergyTable, AnalyzerConfig, AudioFormat, DecodedSampleBuffer, DrcMode,
    SignalEnergyAnalyzer,
};

const SAMPLE_RATE: u32 = 8_000;
const BLOCK_FRAMES: usize = 8_000;
const POSITION_FRAMES: usize = 2 * BLOCK_FRAMES;

/// Generate staggered multichannel content, one two-block window per channel.
fn generate_staggered(channels: usize) -> Vec<i16> {
    let frames = channels * POSITION_FRAMES;
    let mut samples = vec![0i16; frames * channels];
    for ch in 0..channels {
        let start = ch * POSITION_FRAMES;
        for frame in start..start + POSITION_FRAMES {
            let t = (frame - start) as f64 / SAMPLE_RATE as f64;
            let phase = 2.0 * std::f64::consts::PI * 440.0 * t + std::f64::consts::FRAC_PI_4;
            samples[frame * channels + ch] = (phase.sin() * 10_000.0) as i16;
        }
    }
    samples
}

/// Generate continuous stereo content.
fn generate_stereo(blocks: usize) -> Vec<i16> {
    let frames = blocks * BLOCK_FRAMES;
    (0..frames * 2)
        .map(|i| {
            let t = (i / 2) as f64 / SAMPLE_RATE as f64;
            let phase = 2.0 * std::f64::consts::PI * 440.0 * t + std::f64::consts::FRAC_PI_4;
            (phase.sin() * 10_000.0) as i16
        })
        .collect()
}

fn bench_onset_detection(c: &mut Criterion) {
    let mut group = c.benchmark_group("onset_detection");

    for lead_frames in [1_000, 10_000, 100_000].iter() {
        let mut samples = vec![0i16; *lead_frames];
        samples.extend(generate_stereo(2));

        group.bench_with_input(
            BenchmarkId::from_parameter(lead_frames),
            &samples,
            |b, s| b.iter(|| onset::detect(black_box(s), 1)),
        );
    }

    group.finish();
}

fn bench_accumulation(c: &mut Criterion) {
    let mut group = c.benchmark_group("segment_accumulation");

    for blocks in [2, 6, 10].iter() {
        let samples = generate_stereo(*blocks);
        let buffer =
            DecodedSampleBuffer::new(&samples, AudioFormat::new(SAMPLE_RATE, 2)).unwrap();

        group.bench_with_input(BenchmarkId::from_parameter(blocks), &buffer, |b, buf| {
            b.iter(|| SegmentEnergyTable::accumulate(black_box(buf), 0, 2_000))
        });
    }

    group.finish();
}

fn bench_full_analysis(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_analysis");
    let analyzer = SignalEnergyAnalyzer::new(AnalyzerConfig::default());

    // Stereo plays simultaneously; larger layouts play staggered windows.
    let stereo = generate_stereo(2);
    let quad = generate_staggered(4);
    let six = generate_staggered(6);
    let cases: [(usize, &Vec<i16>); 3] = [(2, &stereo), (4, &quad), (6, &six)];

    for (channels, samples) in cases {
        let buffer =
            DecodedSampleBuffer::new(samples, AudioFormat::new(SAMPLE_RATE, channels)).unwrap();

        group.bench_with_input(BenchmarkId::from_parameter(channels), &buffer, |b, buf| {
            b.iter(|| analyzer.analyze(black_box(buf), channels, DrcMode::Off, false))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_onset_detection,
    bench_accumulation,
    bench_full_analysis
);
criterion_main!(benches);
