use honggfuzz::fuzz;
use wedlog::{compute_output_length, decompress, DecodeContext, WedError};

fn main() {
    loop {
        fuzz!(|data: &[u8]| {
            if data.is_empty() {
                return;
            }
            // first byte picks the output capacity, the rest is the stream
            let cap = usize::from(data[0]);
            let input = &data[1..];
            if input.is_empty() {
                return;
            }

            // with room for the whole expansion both passes stop at the same place
            let ctx = DecodeContext::new();
            let sized = compute_output_length(input, &ctx);
            let room = sized.as_ref().map_or_else(|e| e.progress(), |p| *p).produced + 1;
            let mut full = vec![0u8; room];
            let mut full_ctx = ctx.clone();
            let done = decompress(input, &mut full, &mut full_ctx);
            match (sized, done) {
                (Ok(a), Ok(b)) => assert_eq!(a, b),
                (Err(WedError::UnprocessedInput { progress }), Ok(b)) => assert_eq!(progress, b),
                (Err(a), Err(b)) => assert_eq!(a, b),
                (a, b) => panic!("sizer {a:?} vs decompress {b:?}"),
            }

            let mut ctx = DecodeContext::new();
            let mut out = vec![0u8; cap];
            let progress = match decompress(input, &mut out, &mut ctx) {
                Ok(p) => p,
                Err(e) => e.progress(),
            };
            assert!(progress.consumed <= input.len());
            assert!(progress.produced <= cap);
        });
    }
}
