// Token walk-through example
use gifstream::{Decoder, Token};
use std::env;
use std::error::Error;
use std::fs::File;
use std::io::BufReader;

fn main() -> Result<(), Box<dyn Error>> {
    let path = env::args().nth(1).expect("usage: tokens [filename]");
    decode(&path)
}

fn decode(path: &str) -> Result<(), Box<dyn Error>> {
    let f = BufReader::new(File::open(path)?);
    let mut decoder = Decoder::new(f)?;
    println!(
        "GIF{}, {}x{}",
        decoder.version(),
        decoder.width(),
        decoder.height()
    );
    loop {
        match decoder.next_token()? {
            Token::Image => {
                let frame = decoder.read_image()?;
                println!(
                    "frame {}: delay {} cs, {} pixels",
                    frame.index,
                    frame.delay_time_cs,
                    frame.colors.len()
                );
            }
            Token::Comment => println!("comment: {}", decoder.read_comment()?),
            Token::EndOfFile => break,
        }
    }
    Ok(())
}
