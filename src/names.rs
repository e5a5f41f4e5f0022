use rand::Rng;

/// Picks a random "First Last" display name for generated event payloads.
pub fn generate_name() -> String {
    let mut rng = rand::thread_rng();
    format!(
        "{} {}",
        FIRST_NAMES[rng.gen_range(0..FIRST_NAMES.len())],
        LAST_NAMES[rng.gen_range(0..LAST_NAMES.len())]
    )
}

const FIRST_NAMES: &[&str] = &[
    "Alice", "Bob", "Charlie", "Diana", "Ethan", "Fiona", "George", "Hannah", "Ian", "Julia",
    "Kevin", "Linda", "Mark", "Nancy", "Olivia", "Paul", "Quinn", "Rachel", "Steve", "Tina",
    "Ursula", "Victor", "Wendy", "Xavier", "Yvonne", "Zoe", "Aaron", "Bella", "Caleb", "Daisy",
    "Ella", "Felix", "Gina", "Henry", "Isabella", "Jack", "Kylie", "Liam", "Mia", "Noah",
    "Oliver", "Parker", "Riley", "Sophia", "Taylor", "Victoria", "William", "Zachary",
];

const LAST_NAMES: &[&str] = &[
    "Smith", "Johnson", "Williams", "Brown", "Jones", "Garcia", "Miller", "Davis", "Rodriguez",
    "Martinez", "Hernandez", "Lopez", "Gonzalez", "Wilson", "Anderson", "Thomas", "Taylor",
    "Moore", "Jackson", "Martin", "Lee", "Perez", "Thompson", "White", "Harris", "Clark",
    "Lewis", "Robinson", "Walker", "Young",
];
