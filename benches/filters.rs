use criterion::{criterion_group, criterion_main, Criterion};
use mri_display::{filter::{FilterChain, filter_option::FilterParams}, img::Matrix2D};
use mri_display::processing::{HaltMessage, ProgressProvider, WorkerMsg};

fn create_matrix(w: usize, h: usize) -> Matrix2D {
	let pixels = (0..w * h).map(|i| ((i % w) as f64 * 0.01).sin() + ((i / w) as f64 * 0.02).cos() + 3.0).collect();
	Matrix2D::from_pixels(w, h, pixels)
}

pub fn filter_chain_low_pass_log(c: &mut Criterion) {
	let mut chain = FilterChain::new();
	chain.append("Low Pass", &FilterParams::new().with("window", "hamming").with("diameter", 200)).unwrap();
	chain.append("Log Transform", &FilterParams::new()).unwrap();

	let mat = create_matrix(512, 512);

	let mut group = c.benchmark_group("run filter chain");
	group.sample_size(10);
	group.bench_function("low pass + log transform 512x512", move |b| {
		b.iter(|| {
			let (tx_prog, _rx_prog) = std::sync::mpsc::channel::<WorkerMsg>();
			let (_tx_halt, rx_halt) = std::sync::mpsc::channel::<HaltMessage>();

			let mut prog_prov = ProgressProvider::new(&tx_prog, &rx_halt, 0);
			prog_prov.reset(chain.get_steps_num(&mat));

			let _res = chain.apply_with_progress(&mat, &mut prog_prov);
			assert!(prog_prov.all_actions_completed());
		});
	});
	group.finish();
}

criterion_group!(benches, filter_chain_low_pass_log);
criterion_main!(benches);
