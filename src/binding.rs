include!(concat!(env!("OUT_DIR"), "/binding.rs"));
