use anyhow::{Context, Result};

const STATES: [&str; 8] = ["SP", "RJ", "MG", "BA", "RS", "PR", "PE", "CE"];
const PARTIES: [&str; 7] = ["PT", "PL", "PSOL", "PP", "MDB", "PSD", "União"];
const NETWORKS: [&str; 4] = ["Instagram", "Twitter", "Facebook", "TikTok"];
const FIRST: [&str; 10] = [
    "Ana", "Bruno", "Carla", "Diego", "Elisa", "Fábio", "Gabriela", "Heitor", "Iara", "João",
];
const LAST: [&str; 8] = [
    "Silva", "Souza", "Oliveira", "Santos", "Lima", "Costa", "Pereira", "Almeida",
];

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5)).rotate_left(7).wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn below(&mut self, n: u64) -> u64 {
        self.next_u64() % n
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[self.below(items.len() as u64) as usize]
    }

    /// Heavy-tailed count: most deputies are small, a few are huge.
    fn audience(&mut self, scale: u64) -> u64 {
        let exp = self.below(4) as u32;
        self.below(scale) * 10u64.pow(exp)
    }
}

fn write_deputies(rng: &mut SimpleRng, path: &str) -> Result<Vec<String>> {
    let mut wtr = csv::Writer::from_path(path).with_context(|| format!("creating {path}"))?;
    wtr.write_record([
        "nome_deputado",
        "partido",
        "uf",
        "seguidores_twitter",
        "curtidas_instagram",
        "visualizacoes_tiktok",
    ])?;

    let mut names = Vec::new();
    for first in FIRST {
        for last in LAST {
            let name = format!("{first} {last}");
            // Every ninth row leaves a metric blank to exercise the zero fill.
            let tiktok = if names.len() % 9 == 0 {
                String::new()
            } else {
                rng.audience(5_000).to_string()
            };
            let record = [
                name.clone(),
                rng.pick(&PARTIES).to_string(),
                rng.pick(&STATES).to_string(),
                rng.audience(2_000).to_string(),
                rng.audience(3_000).to_string(),
                tiktok,
            ];
            wtr.write_record(&record)?;
            names.push(name);
        }
    }
    wtr.flush().with_context(|| format!("writing {path}"))?;
    Ok(names)
}

fn write_posts(rng: &mut SimpleRng, names: &[String], path: &str) -> Result<usize> {
    const MONTHS: [&str; 6] = ["Jan", "Feb", "Mar", "Apr", "May", "Jun"];

    let mut wtr = csv::WriterBuilder::new()
        .delimiter(b';')
        .from_path(path)
        .with_context(|| format!("creating {path}"))?;
    wtr.write_record([
        "Date",
        "Top 5 values of Network.keyword",
        "Parlamentar",
        "Engajamento total",
        "Top 50 posts",
        "Message",
    ])?;

    let n = 120;
    for i in 0..n {
        let name = &names[rng.below(names.len() as u64) as usize];
        let date = format!(
            "{} {}, 2024 @ {:02}:{:02}:{:02}.000",
            rng.pick(&MONTHS),
            1 + rng.below(28),
            rng.below(24),
            rng.below(60),
            rng.below(60)
        );
        let record = [
            date,
            rng.pick(&NETWORKS).to_string(),
            name.clone(),
            rng.audience(9_000).to_string(),
            (i % 50 + 1).to_string(),
            format!("Post {i} de {name}"),
        ];
        wtr.write_record(&record)?;
    }
    wtr.flush().with_context(|| format!("writing {path}"))?;
    Ok(n)
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);

    let deputies_path = "engajamentodeputados.csv";
    let names = write_deputies(&mut rng, deputies_path)?;

    let posts_path = "posts.csv";
    let n_posts = write_posts(&mut rng, &names, posts_path)?;

    println!(
        "Wrote {} deputies to {deputies_path} and {n_posts} posts to {posts_path}",
        names.len()
    );
    Ok(())
}
