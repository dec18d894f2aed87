// Raster conversion example
use gifstream::{Decoder, Token};
use std::env;
use std::error::Error;
use std::fs::File;
use std::io::BufReader;

fn main() -> Result<(), Box<dyn Error>> {
    let path = env::args().nth(1).expect("usage: raster [filename]");
    decode(&path)
}

fn decode(path: &str) -> Result<(), Box<dyn Error>> {
    let f = BufReader::new(File::open(path)?);
    let mut decoder = Decoder::new(f)?;
    loop {
        match decoder.next_token()? {
            Token::Image => {
                let raster = decoder.read_image()?.to_raster();
                println!("raster: {:?}x{:?}", raster.width(), raster.height());
            }
            Token::Comment => decoder.skip_comment()?,
            Token::EndOfFile => break,
        }
    }
    Ok(())
}
