use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use lazyimg_core::CapabilityFlag;
use lazyimg_gallery::{DescriptorProvider, GalleryConfig, UrlTemplate};
use lazyimg_testing::GalleryTestRule;

const GALLERY_SIZES: &[usize] = &[15, 256, 2048];
const SCROLL_SIZES: &[usize] = &[15, 256];
const ITEM_HEIGHT: f64 = 600.0;

fn descriptors(count: usize) -> Vec<lazyimg_core::ImageDescriptor> {
    UrlTemplate::new("https://img.example/w_400/image_{id}.jpg")
        .with_placeholder("https://img.example/w_20,e_blur/image_{id}.jpg")
        .descriptors((0..count).map(|i| Some(i.to_string())))
}

fn bench_mount(c: &mut Criterion) {
    let mut group = c.benchmark_group("mount");
    for &size in GALLERY_SIZES {
        group.bench_with_input(BenchmarkId::new("fallback", size), &size, |b, &size| {
            b.iter(|| {
                let rule = GalleryTestRule::new(
                    descriptors(size),
                    CapabilityFlag::FALLBACK,
                    GalleryConfig::default(),
                );
                black_box(rule.gallery().stats())
            })
        });
        group.bench_with_input(BenchmarkId::new("native", size), &size, |b, &size| {
            b.iter(|| {
                let rule = GalleryTestRule::new(
                    descriptors(size),
                    CapabilityFlag::NATIVE,
                    GalleryConfig::default(),
                );
                black_box(rule.gallery().stats())
            })
        });
    }
    group.finish();
}

fn bench_scroll_through(c: &mut Criterion) {
    let mut group = c.benchmark_group("scroll_through");
    for &size in SCROLL_SIZES {
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            b.iter(|| {
                let mut rule = GalleryTestRule::new(
                    descriptors(size),
                    CapabilityFlag::FALLBACK,
                    GalleryConfig::default(),
                );
                for step in 0..size {
                    rule.scroll_to(step as f64 * ITEM_HEIGHT);
                }
                black_box(rule.gallery().stats())
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_mount, bench_scroll_through);
criterion_main!(benches);
