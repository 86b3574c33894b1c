use honggfuzz::fuzz;
use wedlog::{log_count, records};

fn main() {
    loop {
        fuzz!(|data: &[u8]| {
            let n: usize = records(data).map(|r| r.log_count()).sum();
            assert_eq!(n, log_count(data));
        });
    }
}
