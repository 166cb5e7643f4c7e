//! Example of decoding a nested table and reading it through the typed and
//! dynamic surfaces.
//!
//! cargo run --package mapbuffer --example nested_access

use mapbuffer::{MapBuffer, from_json};

fn main() -> Result<(), mapbuffer::Error> {
    // Keys are the numeric handles the producer and consumer agreed on.
    let bytes = from_json(r#"{"1": "header", "2": [{"0": "Amy"}, {"0": "Bob"}], "3": 2}"#)?;

    let map = MapBuffer::new(&bytes)?;

    // Checked typed access.
    let title = map.get_string(1)?;
    let count = map.get_int(3)?;
    println!("{title}: {count} users");

    // Dynamic access: entry 2 is a sequence of nested tables.
    let users = map.dynamic(2).as_array()?;
    for index in 0..users.size() {
        let user = users.get_array(index)?;
        println!("  user[{index}] = {}", user.get_string(0)?);
    }

    // Absent keys soften to a default through the `_or` family.
    let flags = map.get_int_or(40, 0)?;
    println!("flags: {flags}");

    Ok(())
}
