use cachesim::manager::CacheManager;
use cachesim::traits::Keyed;

#[derive(Debug, Clone)]
struct Person {
    id: u64,
    name: String,
    age: u32,
}

impl Keyed for Person {
    fn key(&self) -> u64 {
        self.id
    }
}

fn main() {
    let people: Vec<Person> = [
        (0, "Ada", 36),
        (1, "Boris", 52),
        (2, "Clara", 29),
        (3, "Dmitri", 41),
        (4, "Elena", 24),
    ]
    .into_iter()
    .map(|(id, name, age)| Person {
        id,
        name: name.to_string(),
        age,
    })
    .collect();

    let mut cache = CacheManager::new(2).expect("capacity > 0");
    cache.initialize(people);

    cache.get(1);
    cache.get(1);
    if let Some(person) = cache.get(4) {
        println!("fetched {} (age {})", person.name, person.age);
    }

    for key in cache.cache_keys() {
        let entry = cache.cache_entry(key).expect("key just listed");
        println!(
            "key {}: {} accessed {} times",
            key,
            entry.value().name,
            entry.access_count()
        );
    }
}
