use flat_buckets::bucket_map::BucketMap;
use std::collections::HashMap;

const SAMPLE_SIZE: usize = 1_000_000;

fn main() {
    let mut samples: Vec<u64> = Vec::with_capacity(SAMPLE_SIZE);
    for _ in 0..SAMPLE_SIZE {
        samples.push(rand::random::<u64>());
    }

    benchmarking::warm_up();

    let keys = samples.clone();
    let result = benchmarking::measure_function(move |measurer| {
        let mut map: BucketMap<u64, u64> = BucketMap::new();
        measurer.measure(|| {
            for &key in keys.iter() {
                map.set(key, key);
            }
        });
        map
    })
    .unwrap();
    println!(
        "BucketMap set: {:.1} ns/op",
        result.elapsed().as_nanos() as f64 / SAMPLE_SIZE as f64
    );

    let keys = samples.clone();
    let result = benchmarking::measure_function(move |measurer| {
        let mut map: HashMap<u64, u64> = HashMap::new();
        measurer.measure(|| {
            for &key in keys.iter() {
                map.insert(key, key);
            }
        });
        map
    })
    .unwrap();
    println!(
        "HashMap   set: {:.1} ns/op",
        result.elapsed().as_nanos() as f64 / SAMPLE_SIZE as f64
    );

    let keys = samples.clone();
    let result = benchmarking::measure_function(move |measurer| {
        let mut map: BucketMap<u64, u64> = BucketMap::new();
        for &key in keys.iter() {
            map.set(key, key);
        }
        measurer.measure(|| {
            let mut found: usize = 0;
            for &key in keys.iter() {
                if map.contains(key) {
                    found += 1;
                }
            }
            std::hint::black_box(found);
        });
    })
    .unwrap();
    println!(
        "BucketMap get: {:.1} ns/op",
        result.elapsed().as_nanos() as f64 / SAMPLE_SIZE as f64
    );

    let keys = samples.clone();
    let result = benchmarking::measure_function(move |measurer| {
        let mut map: HashMap<u64, u64> = HashMap::new();
        for &key in keys.iter() {
            map.insert(key, key);
        }
        measurer.measure(|| {
            let mut found: usize = 0;
            for &key in keys.iter() {
                if map.contains_key(&key) {
                    found += 1;
                }
            }
            std::hint::black_box(found);
        });
    })
    .unwrap();
    println!(
        "HashMap   get: {:.1} ns/op",
        result.elapsed().as_nanos() as f64 / SAMPLE_SIZE as f64
    );

    let keys = samples.clone();
    let result = benchmarking::measure_function(move |measurer| {
        let mut map: BucketMap<u64, u64> = BucketMap::new();
        for &key in keys.iter() {
            map.set(key, key);
        }
        measurer.measure(|| {
            for &key in keys.iter() {
                map.delete(key);
            }
        });
    })
    .unwrap();
    println!(
        "BucketMap delete: {:.1} ns/op",
        result.elapsed().as_nanos() as f64 / SAMPLE_SIZE as f64
    );

    let keys = samples.clone();
    let result = benchmarking::measure_function(move |measurer| {
        let mut map: HashMap<u64, u64> = HashMap::new();
        for &key in keys.iter() {
            map.insert(key, key);
        }
        measurer.measure(|| {
            for &key in keys.iter() {
                map.remove(&key);
            }
        });
    })
    .unwrap();
    println!(
        "HashMap   delete: {:.1} ns/op",
        result.elapsed().as_nanos() as f64 / SAMPLE_SIZE as f64
    );

    let mut map: BucketMap<u64, u64> = BucketMap::new();
    for &key in samples.iter() {
        map.set(key, key);
    }
    println!("Entries {} capacity {}", map.len(), map.capacity());
    println!("Load factor {}", map.load_factor());
}
