use core::hash::BuildHasher;

use clap::Parser;
use clap::ValueEnum;
use robin_hash::DefaultHashBuilder;
use robin_hash::HashTable;
use robin_hash::hashers::ElfBuildHasher;
use robin_hash::hashers::Murmur3BuildHasher;
use robin_hash::hashers::SaxBuildHasher;
use tracing::Level;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum HashKind {
    Elf,
    Murmur3,
    Sax,
    Default,
}

#[derive(Parser, Debug)]
struct Args {
    #[arg(short = 'c', long = "target_capacity", default_value_t = 1000)]
    target_capacity: usize,

    /// Fraction of the filled keys to remove before reporting.
    #[arg(short = 'r', long = "remove_fraction", default_value_t = 0.0)]
    remove_fraction: f64,

    #[arg(long = "hash", value_enum, default_value_t = HashKind::Murmur3)]
    hash: HashKind,

    /// Log every growth and displaced insertion.
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,
}

fn key_for(i: usize) -> Vec<u8> {
    format!("symbol_{i:08}").into_bytes()
}

fn run<S: BuildHasher>(args: &Args, hash_builder: S) {
    let mut table = HashTable::with_capacity_and_hasher(8, args.target_capacity, hash_builder);

    println!("Actual capacity: {}", table.capacity());
    println!("Filling table with u64 values...");

    let num_values = table.capacity();
    for i in 0..num_values {
        if let Err(err) = table.insert(&key_for(i), &(i as u64).to_le_bytes()) {
            panic!("Failed to insert key {i}: {err}");
        }
    }

    let to_remove = (num_values as f64 * args.remove_fraction.clamp(0.0, 1.0)) as usize;
    for i in 0..to_remove {
        if let Err(err) = table.remove(&key_for(i)) {
            panic!("Failed to remove key {i}: {err}");
        }
    }

    println!("Inserted {} values, removed {}", num_values, to_remove);
    println!(
        "Final load factor: {:.2}%",
        (table.len() as f64 / table.capacity() as f64) * 100.0
    );

    table.probe_histogram().print();
    table.debug_stats().print();
}

fn main() {
    let args = Args::parse();

    let _ = tracing::subscriber::set_global_default(
        tracing_subscriber::fmt()
            .with_max_level(if args.verbose {
                Level::TRACE
            } else {
                Level::INFO
            })
            .finish(),
    );

    println!(
        "Creating HashTable with target capacity: {} ({:?})",
        args.target_capacity, args.hash
    );

    match args.hash {
        HashKind::Elf => run(&args, ElfBuildHasher::default()),
        HashKind::Murmur3 => run(&args, Murmur3BuildHasher::default()),
        HashKind::Sax => run(&args, SaxBuildHasher::default()),
        HashKind::Default => run(&args, DefaultHashBuilder::default()),
    }
}
