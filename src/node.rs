use crate::Uuid;

const SPACES_PER_INDENT: usize = 4;

// One node of the hierarchical text format: a name, an optional scalar
// payload, and ordered children. This tree is the only serialization
// contract between file bytes and loader state.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Node
{
    name: String,
    data: String,
    children: Vec<Node>,
}

impl Node
{
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self
    {
        Self { name: name.into(), data: String::new(), children: Vec::new() }
    }

    #[must_use]
    pub fn with_data(name: impl Into<String>, data: impl Into<String>) -> Self
    {
        Self { name: name.into(), data: data.into(), children: Vec::new() }
    }

    #[inline] #[must_use]
    pub fn name(&self) -> &str { &self.name }

    pub fn set_name(&mut self, name: impl Into<String>) { self.name = name.into(); }

    #[inline] #[must_use]
    pub fn data(&self) -> &str { &self.data }

    pub fn set_data(&mut self, data: impl Into<String>) { self.data = data.into(); }

    #[inline] #[must_use]
    pub fn has_data(&self) -> bool { !self.data.is_empty() }

    #[inline] #[must_use]
    pub fn has_children(&self) -> bool { !self.children.is_empty() }

    #[inline] #[must_use]
    pub fn children(&self) -> &[Node] { &self.children }

    pub fn children_mut(&mut self) -> &mut Vec<Node> { &mut self.children }

    pub fn add_child(&mut self, child: Node)
    {
        self.children.push(child);
    }

    // first child with the given name
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&Node>
    {
        self.children.iter().find(|c| c.name == name)
    }

    // every child with the given name, in order
    #[must_use]
    pub fn find_all(&self, name: &str) -> Vec<&Node>
    {
        self.children.iter().filter(|c| c.name == name).collect()
    }

    // this node as a single serialized line (children excluded)
    #[must_use]
    pub fn node_string(&self) -> String
    {
        match (self.name.is_empty(), self.data.is_empty())
        {
            (true, _) => self.data.clone(),
            (false, true) => self.name.clone(),
            (false, false) => format!("{}: {}", self.name, self.data),
        }
    }

    #[must_use]
    pub fn to_uuid(&self) -> Uuid
    {
        self.data.parse().unwrap_or(Uuid::INVALID)
    }

    #[must_use]
    pub fn to_int(&self, default: i32) -> i32
    {
        self.data.trim().parse().unwrap_or(default)
    }

    #[must_use]
    pub fn to_uint(&self, default: u32) -> u32
    {
        self.data.trim().parse().unwrap_or(default)
    }

    #[must_use]
    pub fn to_size(&self, default: usize) -> usize
    {
        self.data.trim().parse().unwrap_or(default)
    }

    #[must_use]
    pub fn to_float(&self, default: f32) -> f32
    {
        self.data.trim().parse().unwrap_or(default)
    }

    #[must_use]
    pub fn to_bool(&self, default: bool) -> bool
    {
        match self.data.trim()
        {
            s if s.eq_ignore_ascii_case("true") || s == "1" => true,
            s if s.eq_ignore_ascii_case("false") || s == "0" => false,
            _ => default,
        }
    }

    // Parses UTF-8 text into a node tree.
    //
    // One level of nesting per 4 spaces (or one tab). `name: value` lines are
    // named children with scalar payloads, bare `name` lines are named
    // children, `- value` lines are unnamed children. Blank lines and lines
    // starting with '#' are skipped. A leading ": value" line supplies data
    // for the root itself. A line indented more than one level past its
    // predecessor is malformed and discarded with a warning.
    #[must_use]
    pub fn parse(text: &str) -> Node
    {
        let mut root = Node::default();

        let lines: Vec<&str> = text.lines().map(|l| l.trim_end_matches('\r')).collect();
        if lines.is_empty()
        {
            return root;
        }

        if let Some(data) = lines[0].strip_prefix(": ")
        {
            root.data = unescape(data);
        }

        // flatten to (indent, name, data) entries first; the builder below
        // assumes each entry nests at most one level deeper than the previous
        let mut items: Vec<(usize, String, String)> = Vec::new();
        let mut indent = 0usize;
        for line in &lines
        {
            let solid = match line.find(|c: char| !c.is_whitespace())
            {
                Some(i) => i,
                None => continue,
            };
            if line.starts_with('#') || line.starts_with(':')
            {
                continue;
            }

            let mut spaces = 0usize;
            for c in line.chars()
            {
                match c
                {
                    ' ' => spaces += 1,
                    '\t' => spaces += SPACES_PER_INDENT,
                    _ => break,
                }
            }
            let i = spaces / SPACES_PER_INDENT;

            if i > indent + 1
            {
                log::warn!("Discarding line, invalid indent change of {}: {}", i as isize - indent as isize, line);
                continue;
            }
            indent = i;

            let line = &line[solid..];
            let (name, data) = if let Some(rest) = line.strip_prefix("- ")
            {
                // bullet: unnamed child carrying only data
                (String::new(), unescape(rest))
            }
            else
            {
                match line.split_once(':')
                {
                    None => (line.to_string(), String::new()),
                    Some((key, rest)) => (key.to_string(), unescape(rest.strip_prefix(' ').unwrap_or(rest))),
                }
            };

            items.push((i, name, data));
        }

        let mut pos = 0usize;
        root.children = build(&items, &mut pos, 0);
        root
    }
}

fn unescape(value: &str) -> String
{
    value.replace("\\n", "\n")
}

fn build(items: &[(usize, String, String)], pos: &mut usize, depth: usize) -> Vec<Node>
{
    let mut nodes = Vec::new();
    while *pos < items.len()
    {
        let (indent, name, data) = &items[*pos];
        if *indent < depth
        {
            break;
        }

        let mut node = Node::with_data(name.clone(), data.clone());
        *pos += 1;
        node.children = build(items, pos, depth + 1);
        nodes.push(node);
    }
    nodes
}
