use clap::Parser;
use clap::ValueEnum;
use prime_probe::ChainingMap;
use prime_probe::OpenAddressingMap;
use prime_probe::hash::AdditiveHash;
use prime_probe::hash::DefaultHashBuilder;
use prime_probe::hash::PositionalHash;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum HashChoice {
    Additive,
    Positional,
    Default,
}

#[derive(Parser, Debug)]
struct Args {
    #[arg(short = 'c', long = "capacity", default_value_t = 11)]
    capacity: usize,

    #[arg(short = 'n', long = "keys", default_value_t = 150)]
    keys: usize,

    /// Remove every n-th key after filling, leaving tombstones behind.
    #[arg(short = 'r', long = "remove_every", default_value_t = 3)]
    remove_every: usize,

    #[arg(long = "hash", value_enum, default_value_t = HashChoice::Additive)]
    hash: HashChoice,

    /// Print every bucket after filling.
    #[arg(long)]
    dump: bool,
}

fn run<S: core::hash::BuildHasher + Clone>(args: &Args, hash_builder: S) {
    let keys: Vec<String> = (0..args.keys).map(|i| format!("key{}", i)).collect();

    let mut open = OpenAddressingMap::with_capacity_and_hasher(args.capacity, hash_builder.clone());
    let mut chained = ChainingMap::with_capacity_and_hasher(args.capacity, hash_builder);
    for (i, key) in keys.iter().enumerate() {
        open.put(key.as_str(), i * 100);
        chained.put(key.as_str(), i * 100);
    }
    if args.remove_every > 0 {
        for key in keys.iter().step_by(args.remove_every) {
            open.remove(key);
            chained.remove(key);
        }
    }

    println!("--- open addressing ---");
    println!(
        "size {} capacity {} load {:.2} empty buckets {}",
        open.len(),
        open.capacity(),
        open.table_load(),
        open.empty_buckets()
    );
    open.debug_stats().print();
    open.probe_histogram().print();
    if args.dump {
        print!("{}", open);
    }

    println!("--- separate chaining ---");
    println!(
        "size {} capacity {} load {:.2} empty buckets {}",
        chained.len(),
        chained.capacity(),
        chained.table_load(),
        chained.empty_buckets()
    );
    chained.debug_stats().print();
    chained.chain_histogram().print();
    if args.dump {
        print!("{}", chained);
    }
}

fn main() {
    let args = Args::parse();

    println!(
        "Filling both maps with {} keys from a requested capacity of {}",
        args.keys, args.capacity
    );

    match args.hash {
        HashChoice::Additive => run(&args, AdditiveHash),
        HashChoice::Positional => run(&args, PositionalHash),
        HashChoice::Default => run(&args, DefaultHashBuilder::default()),
    }
}
